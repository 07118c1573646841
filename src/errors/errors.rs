use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::TooManyArguments { .. } => "TooManyArguments",
            ErrorImpl::TypeResolutionDivergence { .. } => "TypeResolutionDivergence",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::DuplicateParameter { .. } => "DuplicateParameter",
            ErrorImpl::NestedFunction { .. } => "NestedFunction",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UndefinedFunction { function } => {
                ErrorTip::Suggestion(format!("Function `{}` is never defined", function))
            }
            ErrorImpl::TooManyArguments {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` takes at most {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::TypeResolutionDivergence { .. } => ErrorTip::None,
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::DuplicateParameter { parameter, .. } => ErrorTip::Suggestion(format!(
                "Parameter `{}` appears more than once",
                parameter
            )),
            ErrorImpl::NestedFunction { .. } => ErrorTip::Suggestion(String::from(
                "Functions can only be declared at the top level",
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("undefined function {function:?}")]
    UndefinedFunction { function: String },
    #[error("{function:?} called with more arguments than declared: expected {expected}, received {received}")]
    TooManyArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("too many iterations trying to resolve variable types ({iterations})")]
    TypeResolutionDivergence { iterations: usize },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("duplicate parameter name {parameter:?} in function {function:?}")]
    DuplicateParameter { function: String, parameter: String },
    #[error("function {function:?} declared inside another function")]
    NestedFunction { function: String },
}
