use std::{
    collections::HashMap,
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

use lazy_regex::{lazy_regex, Lazy, Regex};

/// `##` is a literal `#`, `#{name}` is a variable, a lone `#{` without `}` is unclosed.
static RE_PLACEHOLDER: Lazy<Regex> = lazy_regex!(r"##|#\{([^}]*)\}|#\{");

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Undefined variable '{0}' in '{1}'")]
    UndefinedVar(String, String),

    #[error("Unclosed brace in '{0}'")]
    UnclosedBrace(String),

    #[error("Empty command")]
    Empty,
}

/// A program and its arguments, already resolved for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// First element is the program.
    pub fn from_argv(argv: &[String]) -> Result<Self, CommandError> {
        let (program, args) = argv.split_first().ok_or(CommandError::Empty)?;
        Ok(Self::new(program, args.iter().cloned()))
    }

    /// Expands `#{fileStem}` etc. in every element of `template` against `source`.
    pub fn from_template(template: &[String], source: impl AsRef<Path>) -> Result<Self, CommandError> {
        let vars = source_file_vars(source.as_ref());
        let argv = template
            .iter()
            .map(|s| interp(s, &vars))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_argv(&argv)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

fn source_file_vars(filepath: &Path) -> HashMap<&'static str, &OsStr> {
    let mut m: HashMap<_, &OsStr> = HashMap::new();
    m.insert("filePath", filepath.as_os_str());
    m.insert("fileName", filepath.file_name().unwrap_or(filepath.as_os_str()));
    m.insert(
        "fileDir",
        match filepath.parent() {
            Some(d) if !d.as_os_str().is_empty() => d.as_os_str(),
            _ => OsStr::new("."),
        },
    );
    m.insert("fileStem", filepath.file_stem().unwrap_or_default());
    m.insert("fileExt", filepath.extension().unwrap_or_default());
    m
}

pub fn interp(fmt: &str, vars: &HashMap<&str, &OsStr>) -> Result<String, CommandError> {
    let mut res = String::with_capacity(fmt.len() * 2);
    let mut last = 0;
    for caps in RE_PLACEHOLDER.captures_iter(fmt) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        res.push_str(&fmt[last..whole.start()]);
        last = whole.end();

        match (whole.as_str(), caps.get(1)) {
            ("##", _) => res.push('#'),
            (_, Some(name)) => {
                let value = vars.get(name.as_str()).ok_or_else(|| {
                    CommandError::UndefinedVar(name.as_str().to_owned(), fmt.to_owned())
                })?;
                res.push_str(&value.to_string_lossy());
            }
            _ => return Err(CommandError::UnclosedBrace(fmt.to_owned())),
        }
    }
    res.push_str(&fmt[last..]);
    Ok(res)
}
