//! SOAP transport to the SEFAZ authorization web services.
//!
//! Wraps signed fiscal XML in SOAP 1.2 envelopes, POSTs them over a
//! mutually-authenticated TLS channel, and extracts status/result fields from
//! the authority's reply. Endpoint URL selection by jurisdiction is a
//! collaborator concern — every operation takes the target URL explicitly.

mod client;
mod resposta;
mod soap;

pub use client::{SefazClient, TransportError};
pub use resposta::{RespostaSefaz, extrair_motivo, extrair_recibo, extrair_status};
pub use soap::{envelope_autorizacao, envelope_consulta_recibo};

/// SOAP 1.2 envelope namespace.
pub const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// NF-e schema namespace (payloads such as `consReciNFe`).
pub const NFE_NS: &str = "http://www.portalfiscal.inf.br/nfe";

/// WSDL namespace of the batch authorization operation.
pub const WSDL_AUTORIZACAO: &str = "http://www.portalfiscal.inf.br/nfe/wsdl/NFeAutorizacao4";

/// WSDL namespace of the receipt query operation.
pub const WSDL_RET_AUTORIZACAO: &str = "http://www.portalfiscal.inf.br/nfe/wsdl/NFeRetAutorizacao4";

/// Content type required by the SEFAZ SOAP 1.2 endpoints.
pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";
