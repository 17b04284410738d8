use flate2::read::GzDecoder;
use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Streams lines out of a file, transparently gzip-decompressing when the
/// extension is `.gz`. Kept from the teacher's `LineIterator`, simplified to
/// return owned `String`s since nothing downstream needs the `Rc<RefCell<_>>`
/// sharing trick the original used for a single reused buffer.
pub struct LineIterator {
    reader: Box<dyn BufRead>,
}

impl LineIterator {
    pub fn new(input_file: &Path) -> io::Result<LineIterator> {
        let file = File::open(input_file)?;
        match input_file.extension().and_then(OsStr::to_str) {
            Some("gz") => Ok(LineIterator {
                reader: Box::new(BufReader::new(GzDecoder::new(file))),
            }),
            _ => Ok(LineIterator {
                reader: Box::new(BufReader::new(file)),
            }),
        }
    }
}

impl Iterator for LineIterator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }
}

/// Loads every line of every regular file in `dir`, in sorted filename order,
/// into memory. The pipeline's reader contract (`read(index) -> String`, empty
/// string terminates the pass, restartable by index) is trivial to satisfy once
/// the corpus is a flat `Vec<String>`; for corpora too large to hold in memory
/// a streaming reader keyed on a persistent line-offset index would replace
/// this, but the three-pass contract itself is unaffected either way.
pub fn read_corpus_lines(dir: &Path) -> io::Result<Vec<String>> {
    let mut paths: Vec<_> = dir
        .read_dir()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut lines = Vec::new();
    for path in paths {
        for line in LineIterator::new(&path)? {
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
    }
    Ok(lines)
}

/// The external character-tokenizer collaborator (§6, §9): splits a document
/// into its sequence of 16-bit code units, treating any character outside the
/// basic multilingual plane as two independent surrogate units rather than one
/// combined code point (the observed, flagged-as-known-defect source behavior).
/// Each unit's display form is what gets interned into the token dictionary,
/// so `WordInfo::form` reconstructs as readable text.
pub fn default_tokenizer(doc: &str) -> Vec<String> {
    doc.encode_utf16()
        .map(|unit| String::from_utf16_lossy(&[unit]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tokenizer_splits_into_code_units() {
        let tokens = default_tokenizer("abc");
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn default_tokenizer_handles_non_bmp_as_two_units() {
        // U+1F600 GRINNING FACE is a surrogate pair in UTF-16.
        let tokens = default_tokenizer("\u{1F600}");
        assert_eq!(tokens.len(), 2);
    }
}
