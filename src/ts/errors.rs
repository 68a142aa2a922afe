use crate::ts::lang::SourceLang;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to set {lang} grammar for parser")]
    LanguageSet { lang: SourceLang },

    #[error("parser produced no tree")]
    ParseFailed,

    #[error("{line}:{column}: {detail}")]
    SyntaxError {
        line: usize,
        column: usize,
        byte_start: usize,
        byte_end: usize,
        detail: String,
    },
}
