//! # dfe
//!
//! Brazilian electronic fiscal document (DC-e / NF-e family) emission:
//! deterministic 44-digit access keys, canonical schema-ordered XML, and
//! SOAP transport to the SEFAZ web services over mutually-authenticated TLS.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Digital signature (XML-DSig) application, endpoint selection by
//! jurisdiction, and persistence are external collaborators: this crate hands
//! out unsigned XML and transmits whatever signed XML it is given back.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dfe::core::*;
//! use rust_decimal_macros::dec;
//!
//! let emissao = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let dce = DceBuilder::new(1, 35, emissao)
//!     .codigo_numerico(12345678)
//!     .serie(1)
//!     .numero(1)
//!     .versao_aplicativo("1.0.0")
//!     .remetente("34028316000103", "Correios", EnderecoBuilder::new(
//!         "SBN Quadra 1", "1", "Asa Norte", "5300108", "Brasília", "DF", "70002-900").build())
//!     .destinatario(DocumentoFiscal::Cpf("12345678901".into()), "João da Silva",
//!         EnderecoBuilder::new("Rua A", "100", "Centro", "3550308", "São Paulo", "SP", "01001-000").build())
//!     .add_item(ItemBuilder::new("001", "Livro", "49019900", dec!(1), dec!(10.00)).build())
//!     .build()
//!     .unwrap();
//!
//! let chave = ChaveAcesso::gerar(&dce).unwrap();
//! assert_eq!(chave.as_str().len(), 44);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document types, validation, access-key generation |
//! | `dce` | Canonical `enviDCe` XML serialization |
//! | `sefaz` | PKCS#12 credential store + SEFAZ SOAP client |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "dce")]
pub mod dce;

#[cfg(feature = "sefaz")]
pub mod certificado;

#[cfg(feature = "sefaz")]
pub mod sefaz;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
