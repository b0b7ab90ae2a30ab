pub mod environment;
pub mod err;
pub mod interpreter;
pub mod lexis;
pub mod syntax;
