use std::fs;

use rst_common::with_logging::log::{info, warn};

use prople_pocket_core::cesr::{CesrError, Stream};
use prople_pocket_core::wallet::extract_credential;

use crate::errors::CliError;

use super::print_credential;

/// `Parse` frames every credential of a CESR stream file and prints it
pub struct Parse {
    file: String,
}

impl Parse {
    pub fn new(file: String) -> Self {
        Self { file }
    }

    pub fn run(&self) -> Result<usize, CliError> {
        let bytes = fs::read(&self.file).map_err(|err| CliError::IoError(err.to_string()))?;
        let mut stream = Stream::from(bytes);

        let mut framed = 0;
        while !stream.is_empty() {
            let before = stream.len();
            match extract_credential(&mut stream) {
                Ok((credential, proof)) => {
                    print_credential(&credential, &proof);
                    framed += 1;
                }
                Err(CesrError::ShortInput { needed, available }) => {
                    warn!(
                        "stream ends with a partial credential, needed {} bytes, got {}",
                        needed, available
                    );
                    break;
                }
                Err(err) if stream.len() < before => {
                    warn!("credential body skipped: {}", err);
                }
                Err(err) => return Err(CliError::StreamError(err.to_string())),
            }
        }

        info!("{} credentials framed from {}", framed, self.file);
        Ok(framed)
    }
}
