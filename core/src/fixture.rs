use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

pub type TestId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FixtureKind {
    Input,
    Output,
    Answer,
}

impl FixtureKind {
    fn suffix(self) -> &'static str {
        use FixtureKind::*;
        match self {
            Input => "in",
            Output => "out",
            Answer => "ans",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("{kind} file not found in {}", .path.to_string_lossy())]
    Missing { kind: FixtureKind, path: PathBuf },

    #[error("No testcases available for this file: {}", .0.to_string_lossy())]
    NoFixtures(PathBuf),

    #[error("No testcase id left after {0}")]
    IdExhausted(TestId),

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}

/// Input, produced-output and expected-answer paths of one testcase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePaths {
    pub id: TestId,
    pub input: PathBuf,
    pub output: PathBuf,
    pub answer: PathBuf,
}

impl FixturePaths {
    /// `dir/main.cpp` with id 3 gives `dir/main.in3`, `dir/main.out3`, `dir/main.ans3`.
    pub fn new(source: impl AsRef<Path>, id: TestId) -> Self {
        let stem = source.as_ref().with_extension("");
        let path_of = |kind: FixtureKind| {
            let mut s: OsString = stem.clone().into_os_string();
            s.push(format!(".{}{}", kind.suffix(), id));
            PathBuf::from(s)
        };
        Self {
            id,
            input: path_of(FixtureKind::Input),
            output: path_of(FixtureKind::Output),
            answer: path_of(FixtureKind::Answer),
        }
    }

    pub fn check_present(&self) -> Result<(), FixtureError> {
        for (kind, path) in [
            (FixtureKind::Input, &self.input),
            (FixtureKind::Answer, &self.answer),
        ] {
            if !path.is_file() {
                return Err(FixtureError::Missing {
                    kind,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Enumerates ids of `{stem}.in{n}` files next to `source`, ascending.
pub fn find_test_ids(source: impl AsRef<Path>) -> Result<Vec<TestId>, FixtureError> {
    let source = source.as_ref();
    let dir = match source.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let Some(stem) = source.file_stem() else {
        return Ok(Vec::new());
    };
    let prefix = format!("{}.{}", stem.to_string_lossy(), FixtureKind::Input.suffix());

    let mut ids = Vec::new();
    for entry in fsutil::read_dir(dir)?.filter_map(Result::ok) {
        let Ok(ft) = entry.file_type() else {
            continue;
        };
        if ft.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(digits) = name.to_str().and_then(|s| s.strip_prefix(&prefix)) else {
            continue;
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(id) = digits.parse::<TestId>() {
            ids.push(id);
        }
    }
    ids.sort_unstable();
    ids.dedup();
    log::debug!("Found testcases {:?} for {}", ids, source.to_string_lossy());
    Ok(ids)
}

pub fn next_test_id(source: impl AsRef<Path>) -> Result<TestId, FixtureError> {
    let ids = find_test_ids(source)?;
    match ids.last() {
        None => Ok(1),
        Some(&last) => last.checked_add(1).ok_or(FixtureError::IdExhausted(last)),
    }
}
