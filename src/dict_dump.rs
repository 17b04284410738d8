use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use word_detector::error::WordDetectorError;
use word_detector::TokenDictionary;

/// Reads a dictionary persisted by `extract` (component B's `write_to`
/// framing) and writes it back out as plain `id\tword` lines, one per token,
/// in ascending id order. Mirrors the teacher's `handle_top_k_words` in
/// spirit: a small inspection tool over the pipeline's persisted state rather
/// than a second scoring pass.
pub fn handle_dict_dump(input_file: &Path, output_file: &Path) -> Result<(), WordDetectorError> {
    info!("reading token dictionary from {:?}", input_file);
    let dict = TokenDictionary::read_from(BufReader::new(File::open(input_file)?))?;
    info!("dictionary contains {} tokens", dict.len());

    let mut out = BufWriter::new(File::create(output_file)?);
    for id in 0..dict.len() as u32 {
        writeln!(out, "{id}\t{}", dict.str_of(id))?;
    }
    out.flush()?;
    Ok(())
}
