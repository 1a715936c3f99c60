use std::str::FromStr;

use anyhow::{Context, bail};

/// A `Name: Value` request header from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name:  String,
    pub value: String,
}

impl Header {
    pub fn into_pair(self) -> (String, String) { (self.name, self.value) }
}

impl FromStr for Header {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once(':')
            .with_context(|| format!("header {s:?} is not of the form \"Name: Value\""))?;

        if name.trim().is_empty() {
            bail!("header {s:?} has an empty name");
        }
        Ok(Header {
            name:  name.to_string(),
            value: value.trim_start().to_string(),
        })
    }
}
