use logos::Logos;

/// Tokens of a single `@patch` annotation, e.g. `patch app.entity_table`.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum Token<'a> {
    #[token(".")]
    Dot,

    /// Any run of characters other than whitespace and `.`
    #[regex(r"[^\s.]+", |lex| lex.slice())]
    Name(&'a str),

    #[error]
    #[regex(r"\s+", logos::skip)]
    Error,

    /// Token indicates the end of the input
    End,
}
