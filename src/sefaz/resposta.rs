//! Extraction of status fields from authority replies.
//!
//! Partial or unexpected replies are expected during outages, so a missing
//! element — or a reply that is not well-formed XML at all — yields `None`
//! rather than an error. Matching is on the local element name, tolerant of
//! whatever namespace prefixes the authority's SOAP stack emits.

use quick_xml::Reader;
use quick_xml::events::Event;

/// cStat: the authority status code (e.g. "103" = batch received).
pub fn extrair_status(xml: &str) -> Option<String> {
    primeiro_texto(xml, b"cStat")
}

/// xMotivo: the human-readable status message.
pub fn extrair_motivo(xml: &str) -> Option<String> {
    primeiro_texto(xml, b"xMotivo")
}

/// nRec: the receipt number of a submission acknowledgement.
pub fn extrair_recibo(xml: &str) -> Option<String> {
    primeiro_texto(xml, b"nRec")
}

/// The three standard reply fields, parsed in one pass each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespostaSefaz {
    pub status: Option<String>,
    pub motivo: Option<String>,
    pub recibo: Option<String>,
}

impl RespostaSefaz {
    pub fn parse(xml: &str) -> Self {
        Self {
            status: extrair_status(xml),
            motivo: extrair_motivo(xml),
            recibo: extrair_recibo(xml),
        }
    }
}

/// Text content of the first element whose local name matches, or `None`.
fn primeiro_texto(xml: &str, local: &[u8]) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut dentro = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == local => dentro = true,
            Ok(Event::Text(ref t)) if dentro => {
                return t.unescape().ok().map(|c| c.into_owned());
            }
            Ok(Event::End(_)) if dentro => return None, // element was empty
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RETORNO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <retEnviDCe xmlns="http://www.portalfiscal.inf.br/dce" versao="1.00">
            <tpAmb>2</tpAmb>
            <cStat>103</cStat>
            <xMotivo>Lote recebido com sucesso</xMotivo>
            <infRec><nRec>351000012345678</nRec></infRec>
        </retEnviDCe>"#;

    #[test]
    fn extracts_all_fields() {
        let r = RespostaSefaz::parse(RETORNO);
        assert_eq!(r.status.as_deref(), Some("103"));
        assert_eq!(r.motivo.as_deref(), Some("Lote recebido com sucesso"));
        assert_eq!(r.recibo.as_deref(), Some("351000012345678"));
    }

    #[test]
    fn missing_element_is_absent_not_error() {
        let xml = "<retEnviDCe><cStat>225</cStat></retEnviDCe>";
        assert_eq!(extrair_status(xml).as_deref(), Some("225"));
        assert_eq!(extrair_motivo(xml), None);
        assert_eq!(extrair_recibo(xml), None);
    }

    #[test]
    fn namespace_prefixes_are_tolerated() {
        let xml = r#"<ns2:retEnviDCe xmlns:ns2="http://www.portalfiscal.inf.br/dce">
            <ns2:cStat>104</ns2:cStat></ns2:retEnviDCe>"#;
        assert_eq!(extrair_status(xml).as_deref(), Some("104"));
    }

    #[test]
    fn malformed_xml_is_absent() {
        assert_eq!(extrair_status("this is not xml <"), None);
        assert_eq!(extrair_status(""), None);
    }

    #[test]
    fn unescapes_text_content() {
        let xml = "<r><xMotivo>Rejei&#231;&#227;o: duplicidade &amp; erro</xMotivo></r>";
        assert_eq!(
            extrair_motivo(xml).as_deref(),
            Some("Rejeição: duplicidade & erro")
        );
    }
}
