use std::{
    fmt, fs,
    io::{self, Read},
    path::PathBuf,
    str::FromStr,
};

use anyhow::Context;

use crate::{page::RawPage, source::Source};

/// A page saved earlier, e.g. with `fetch --save-raw`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocalPage {
    Stdin,
    File(PathBuf),
}

impl FromStr for LocalPage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Existence is checked on load so the error carries the I/O cause.
        if s == "-" {
            Ok(LocalPage::Stdin)
        } else {
            Ok(LocalPage::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for LocalPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalPage::Stdin => f.write_str("<stdin>"),
            LocalPage::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Source for LocalPage {
    fn load(&self) -> anyhow::Result<RawPage> {
        let bytes = match self {
            LocalPage::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .context("failed to read stdin")?;
                buf
            }
            LocalPage::File(path) => {
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
            }
        };
        Ok(RawPage::from_bytes(&bytes))
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}
