#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use textform_convert as convert;
pub use textform_convert::derive;
