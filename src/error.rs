use std::fmt;

#[derive(Debug)]
pub enum CodestampError {
    Generic(String),
    IoError(std::io::Error),
    GitCliError {
        code: Option<i32>,
        stderr: String,
        args: Vec<String>,
    },
    JsonError(serde_json::Error),
    Utf8Error(std::string::FromUtf8Error),
}

impl fmt::Display for CodestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodestampError::Generic(msg) => write!(f, "{}", msg),
            CodestampError::IoError(err) => write!(f, "io error: {}", err),
            CodestampError::GitCliError { code, stderr, args } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                write!(
                    f,
                    "git {} exited with {}: {}",
                    args.join(" "),
                    code,
                    stderr.trim()
                )
            }
            CodestampError::JsonError(err) => write!(f, "json error: {}", err),
            CodestampError::Utf8Error(err) => write!(f, "invalid utf-8 in git output: {}", err),
        }
    }
}

impl std::error::Error for CodestampError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodestampError::IoError(err) => Some(err),
            CodestampError::JsonError(err) => Some(err),
            CodestampError::Utf8Error(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodestampError {
    fn from(err: std::io::Error) -> Self {
        CodestampError::IoError(err)
    }
}

impl From<serde_json::Error> for CodestampError {
    fn from(err: serde_json::Error) -> Self {
        CodestampError::JsonError(err)
    }
}

impl From<std::string::FromUtf8Error> for CodestampError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CodestampError::Utf8Error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn git_cli_error_reports_args_and_code() {
        let err = CodestampError::GitCliError {
            code: Some(128),
            stderr: "fatal: not a git repository\n".to_string(),
            args: vec!["rev-parse".to_string(), "--show-toplevel".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("rev-parse --show-toplevel"));
        assert!(text.contains("128"));
        assert!(text.contains("not a git repository"));
    }

    #[test]
    fn io_and_utf8_errors_convert_via_question_mark() {
        fn read() -> Result<String, CodestampError> {
            let bytes = vec![0xff, 0xfe];
            Ok(String::from_utf8(bytes)?)
        }
        match read() {
            Err(CodestampError::Utf8Error(_)) => {}
            other => panic!("expected Utf8Error, got {:?}", other),
        }

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CodestampError::from(io);
        assert!(matches!(err, CodestampError::IoError(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
