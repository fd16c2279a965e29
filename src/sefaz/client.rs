use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::certificado::CertificadoDigital;
use crate::core::{Ambiente, DfeError};

use super::{SOAP_CONTENT_TYPE, soap};

/// Errors from the SOAP transport layer.
///
/// These are surfaced to the caller as-is: the client never retries and
/// never interprets a transport failure as an authority reply.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The HTTPS client could not be constructed (TLS identity problems).
    #[error("failed to build HTTPS client: {0}")]
    Cliente(String),

    /// Connectivity, TLS handshake, or timeout failure.
    #[error("network error: {0}")]
    Rede(String),

    /// The web service answered with a non-success HTTP status. The body is
    /// kept for diagnostics but is not parsed as an authority response.
    #[error("HTTP {status} from authority web service")]
    Http { status: u16, corpo: String },

    /// The SOAP envelope could not be built.
    #[error(transparent)]
    Envelope(#[from] DfeError),
}

/// Synchronous SOAP client for the SEFAZ web services.
///
/// Holds a pooled HTTPS client whose TLS identity comes from the loaded
/// [`CertificadoDigital`]; each call is a single blocking request–response
/// and the client may be shared across threads. The environment flag used by
/// receipt queries is fixed at construction.
pub struct SefazClient {
    http: reqwest::blocking::Client,
    ambiente: Ambiente,
}

impl SefazClient {
    /// Build a client with the default 30-second deadline.
    pub fn novo(
        certificado: &CertificadoDigital,
        ambiente: Ambiente,
    ) -> Result<Self, TransportError> {
        Self::novo_com_timeout(certificado, ambiente, Duration::from_secs(30))
    }

    /// Build a client with a caller-chosen request deadline. A hung exchange
    /// blocks its caller until this deadline fires — there is no other
    /// cancellation primitive.
    pub fn novo_com_timeout(
        certificado: &CertificadoDigital,
        ambiente: Ambiente,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .identity(certificado.identity())
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Cliente(e.to_string()))?;
        Ok(Self { http, ambiente })
    }

    /// Submit a signed document batch for authorization.
    ///
    /// Returns the raw authority response XML; use the
    /// [`resposta`](super::resposta) extractors to read status fields.
    pub fn enviar_lote(&self, xml_assinado: &str, url: &str) -> Result<String, TransportError> {
        info!(url, "submitting signed batch to SEFAZ");
        let envelope = soap::envelope_autorizacao(xml_assinado)?;
        self.post_soap(url, envelope)
    }

    /// Query the processing result for a previously returned receipt number.
    pub fn consultar_recibo(&self, recibo: &str, url: &str) -> Result<String, TransportError> {
        info!(recibo, url, "querying authorization receipt");
        let envelope = soap::envelope_consulta_recibo(recibo, self.ambiente)?;
        self.post_soap(url, envelope)
    }

    fn post_soap(&self, url: &str, envelope: String) -> Result<String, TransportError> {
        let resposta = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .body(envelope)
            .send()
            .map_err(|e| TransportError::Rede(e.to_string()))?;

        let status = resposta.status();
        let corpo = resposta
            .text()
            .map_err(|e| TransportError::Rede(e.to_string()))?;

        if !status.is_success() {
            error!(status = status.as_u16(), "authority web service returned HTTP error");
            return Err(TransportError::Http {
                status: status.as_u16(),
                corpo,
            });
        }

        debug!(bytes = corpo.len(), "authority response received");
        Ok(corpo)
    }

    /// Environment flag this client was built for.
    pub fn ambiente(&self) -> Ambiente {
        self.ambiente
    }
}
