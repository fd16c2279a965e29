//! SOAP 1.2 envelope construction.
//!
//! Envelopes are built with the same structured writer as the documents, not
//! by string concatenation, so operation names and attributes can never
//! produce malformed XML. The fiscal payload itself travels base64-encoded
//! inside `nfeDadosMsg`, which neutralizes any markup it contains.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::core::{Ambiente, DfeError};
use crate::dce::xml_utils::XmlWriter;

use super::{NFE_NS, SOAP_NS, WSDL_AUTORIZACAO, WSDL_RET_AUTORIZACAO};

/// Envelope for the batch authorization operation (`nfeAutorizacaoLote`).
/// `xml_assinado` is the externally signed document XML.
pub fn envelope_autorizacao(xml_assinado: &str) -> Result<String, DfeError> {
    envelope(
        WSDL_AUTORIZACAO,
        "nfe:nfeAutorizacaoLote",
        &BASE64.encode(xml_assinado.as_bytes()),
    )
}

/// Envelope for the receipt query operation (`nfeRetAutorizacaoLote`).
pub fn envelope_consulta_recibo(recibo: &str, ambiente: Ambiente) -> Result<String, DfeError> {
    let consulta = payload_consulta_recibo(recibo, ambiente)?;
    envelope(
        WSDL_RET_AUTORIZACAO,
        "nfe:nfeRetAutorizacaoLote",
        &BASE64.encode(consulta.as_bytes()),
    )
}

/// The `consReciNFe` payload carried inside the receipt query.
fn payload_consulta_recibo(recibo: &str, ambiente: Ambiente) -> Result<String, DfeError> {
    let mut w = XmlWriter::fragment();
    w.start_element_with_attrs("consReciNFe", &[("xmlns", NFE_NS), ("versao", "4.00")])?;
    w.text_element("tpAmb", &ambiente.code().to_string())?;
    w.text_element("nRec", recibo)?;
    w.end_element("consReciNFe")?;
    w.into_string()
}

fn envelope(wsdl_ns: &str, operacao: &str, dados_base64: &str) -> Result<String, DfeError> {
    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs(
        "soap:Envelope",
        &[("xmlns:soap", SOAP_NS), ("xmlns:nfe", wsdl_ns)],
    )?;
    w.start_element("soap:Header")?;
    w.end_element("soap:Header")?;
    w.start_element("soap:Body")?;
    w.start_element(operacao)?;
    w.text_element("nfe:nfeDadosMsg", dados_base64)?;
    w.end_element(operacao)?;
    w.end_element("soap:Body")?;
    w.end_element("soap:Envelope")?;
    w.into_string()
}
