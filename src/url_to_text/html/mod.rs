pub mod extractors;
mod lang;

pub use self::lang::{detect_lang, lang_of_document};
