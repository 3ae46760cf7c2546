use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::agent::QuestionResult;
use crate::scoring::{ScoreSet, ScoreSummary};

use super::error::{OutputError, OutputResult};

/// Writes the guess traces of a run, one inner array per question.
pub fn write_predictions(path: impl AsRef<Path>, results: &[QuestionResult]) -> OutputResult<()> {
    let path = path.as_ref();
    write_json(path, &results)?;
    info!(
        path = %path.display(),
        questions = results.len(),
        guesses = results.iter().map(Vec::len).sum::<usize>(),
        "Wrote predictions"
    );
    Ok(())
}

/// Reads a predictions file written by [`write_predictions`] (or an older harness).
pub fn read_predictions(path: impl AsRef<Path>) -> OutputResult<Vec<QuestionResult>> {
    read_json(path.as_ref())
}

pub fn write_scores(path: impl AsRef<Path>, scores: &ScoreSet) -> OutputResult<()> {
    let path = path.as_ref();
    write_json(path, scores)?;
    info!(path = %path.display(), questions = scores.len(), "Wrote scores");
    Ok(())
}

pub fn read_scores(path: impl AsRef<Path>) -> OutputResult<ScoreSet> {
    read_json(path.as_ref())
}

/// One-line JSON rendering of the corpus means.
pub fn summary_json(summary: &ScoreSummary) -> OutputResult<String> {
    Ok(serde_json::to_string(summary)?)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let temp_path = temp_path(path);
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    {
        let file = File::create(&temp_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value).map_err(|source| OutputError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(io_err)?;
        writer.get_ref().sync_all().map_err(io_err)?;
    }

    fs::rename(&temp_path, path).map_err(io_err)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> OutputResult<T> {
    let file = File::open(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| OutputError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
