//! Vigil Lexicon - Supervised-communication scanning
//!
//! Compiles a lexicon of weighted regex patterns and scans communication
//! batches for language that warrants review: promissory performance
//! claims, steering clients off supervised channels. Each hit becomes a
//! Comms alert whose severity is the matched entry's weight.

pub mod entry;
pub mod error;
pub mod scanner;

pub use entry::{seed_lexicons, LexiconEntry, OFF_CHANNEL_COMMS, PROMISSORY_LANGUAGE};
pub use error::{LexiconError, LexiconResult};
pub use scanner::{LexiconEngine, LexiconScan};
