//! Canonical DC-e XML generation (`enviDCe`, layout 1.00).
//!
//! Produces the unsigned batch envelope: the signing collaborator applies
//! XML-DSig over `infDCe` and hands the signed document back for transport.
//!
//! # Example
//!
//! ```no_run
//! use dfe::core::Dce;
//! use dfe::dce;
//!
//! let documento: Dce = todo!(); // build via DceBuilder
//! let xml = dce::to_envi_xml(&documento).unwrap();
//! assert!(xml.starts_with("<?xml"));
//! ```

mod envio;
pub(crate) mod xml_utils;

pub use envio::to_envi_xml;
pub use xml_utils::format_decimal;

/// DC-e schema namespace.
pub const DCE_NS: &str = "http://www.portalfiscal.inf.br/dce";

/// Layout version rendered in `versao` attributes.
pub const DCE_VERSAO: &str = "1.00";
