use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use word_detector::error::WordDetectorError;
use word_detector::{Config, WordDetector, WordInfo};

use crate::util::{default_tokenizer, read_corpus_lines};

/// Runs the three-pass extraction pipeline over every file in `input_dir` and
/// writes the ranked, gzip-compressed word list to `output_file`, plus the
/// surviving token dictionary to a sibling `.dict` file. Mirrors the teacher's
/// `handle_create_frequencies` -> `persist_to_file` shape: load the corpus,
/// run the pipeline, gzip the result.
pub fn handle_extract(
    input_dir: &Path,
    output_file: &Path,
    min_cnt: u32,
    max_word_len: usize,
    min_score: f32,
    num_threads: usize,
) -> Result<(), WordDetectorError> {
    info!("loading corpus from {:?}", input_dir);
    let lines = read_corpus_lines(input_dir)?;
    info!("loaded {} lines", lines.len());

    let config = Config::new(min_cnt, max_word_len, min_score, num_threads);
    let detector = WordDetector::new(config);
    let reader = move |i: usize| lines.get(i).cloned().unwrap_or_default();
    let (dict, mut words) = detector.extract_words(reader, default_tokenizer)?;
    words.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    info!("extracted {} candidate words", words.len());

    write_words(output_file, &words)?;
    let dict_path = dict_path_for(output_file);
    info!("writing token dictionary to {:?}", dict_path);
    dict.write_to(BufWriter::new(File::create(dict_path)?))?;

    Ok(())
}

fn write_words(output_file: &Path, words: &[WordInfo]) -> Result<(), WordDetectorError> {
    let file = File::create(output_file)?;
    let encoder = GzEncoder::new(file, Compression::best());
    let mut out = BufWriter::new(encoder);
    writeln!(out, "\\data\\")?;
    writeln!(out, "candidates = {}", words.len())?;
    writeln!(out)?;
    writeln!(out, "\\words:")?;
    for w in words {
        writeln!(
            out,
            "{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{}",
            w.freq,
            w.score,
            w.l_branch,
            w.r_branch,
            w.l_cohesion,
            w.r_cohesion,
            w.form.join("")
        )?;
    }
    writeln!(out)?;
    writeln!(out, "\\end\\")?;
    out.into_inner().map_err(|e| std::io::Error::other(e.to_string()))?.finish()?.flush()?;
    Ok(())
}

fn dict_path_for(output_file: &Path) -> PathBuf {
    let stem = output_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "words".to_string());
    let mut path = output_file.to_path_buf();
    path.set_file_name(format!("{stem}.dict"));
    path
}
