// Rule engine - signature option parsing, keyword registry and match lists
pub mod keyword;
pub mod parser;
pub mod signature;
pub mod window;

pub use keyword::{Keyword, KeywordTable, BUILTIN_KEYWORDS};
pub use parser::{parse_option_list, parse_signature};
pub use signature::{SigMatch, Signature};
pub use window::{WindowMatch, MAX_WINDOW_VALUE};
