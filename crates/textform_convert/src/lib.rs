#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use
// `textform_convert` in doc testing (and in derive-generated code). An
// `extern self` ensures `textform_convert` can be used as an alias for
// `crate` everywhere.
extern crate self as textform_convert;

// -----------------------------------------------------------------------------
// Modules

mod convention;
mod error;
mod from_text;
mod impls;
mod value;

pub mod converter;
pub mod erased;
pub mod factory;
pub mod info;
pub mod probe;
pub mod registry;
pub mod serde;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use convention::{BoxError, Convention, ConvertImpl, ParamShape, RenderImpl};
pub use converter::StringConverter;
pub use erased::TokenConverter;
pub use error::ConvertError;
pub use factory::{ConverterFactory, TextConverterFactory};
pub use from_text::FromText;
pub use value::TextValue;

pub use textform_derive as derive;

// -----------------------------------------------------------------------------
// Macro exports

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
