use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// DC-e — Declaração de Conteúdo Eletrônica, the top-level document.
///
/// Instances are produced by [`DceBuilder`](super::DceBuilder), which
/// validates the data and computes [`valor_total`](Self::valor_total); a
/// `Dce` that exists is structurally valid. The 44-digit access key is never
/// stored here — it is recomputed from these fields on every use so the
/// embedded identifier can never drift from the document content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dce {
    /// Batch (lote) identifier used by the enclosing `enviDCe` wrapper.
    pub lote: u64,
    /// IBGE code of the issuing UF (e.g. 35 = São Paulo).
    pub uf: u8,
    /// cDC: random numeric code, at most 8 digits.
    pub codigo_numerico: u32,
    /// Document model — fixed per document family (59 for DC-e).
    pub modelo: Modelo,
    /// Series, at most 3 digits.
    pub serie: u16,
    /// Document number, at most 9 digits.
    pub numero: u32,
    /// Issue timestamp. The schema carries no timezone suffix.
    pub emissao: NaiveDateTime,
    /// tpEmis: emission type.
    pub tipo_emissao: TipoEmissao,
    /// tpAmb: production or homologation.
    pub ambiente: Ambiente,
    /// finDCe: purpose code (1 = normal).
    pub finalidade: u8,
    /// procEmi: issuance-process code (0 = own application).
    pub processo_emissao: u8,
    /// verProc: version of the issuing application.
    pub versao_aplicativo: String,
    /// Sender party (rem) — typically the postal operator.
    pub remetente: Remetente,
    /// Recipient party (dest).
    pub destinatario: Destinatario,
    /// Declared content, never empty. Append-only during construction.
    pub itens: Vec<Item>,
    /// vDC: document total, the sum of all item totals.
    pub valor_total: Decimal,
    /// modFrete: freight modality code (9 = no freight, the DC-e default).
    pub modalidade_frete: u8,
    /// Postal tracking code, rendered as free text in `infAdic` when present.
    pub codigo_rastreio: Option<String>,
    /// Postal service modality (SEDEX, PAC, ...). Data-only, never rendered.
    pub modalidade_postagem: Option<String>,
    /// Total parcel weight in kg. Data-only.
    pub peso_total: Option<Decimal>,
    /// Parcel object type (box, envelope, ...). Data-only.
    pub objeto_postal: Option<String>,
}

/// Sender party. The CNPJ here is mandatory — it feeds the access key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Remetente {
    /// CNPJ, exactly 14 digits.
    pub cnpj: String,
    /// Legal name.
    pub nome: String,
    /// Postal address.
    pub endereco: Endereco,
}

/// Recipient party.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destinatario {
    /// CNPJ or CPF. Exactly one — the enum makes "both" unrepresentable.
    pub documento: DocumentoFiscal,
    /// Name.
    pub nome: String,
    /// Postal address.
    pub endereco: Endereco,
}

/// Brazilian tax identifier of a recipient: company (CNPJ) or person (CPF).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentoFiscal {
    /// 14-digit company identifier.
    Cnpj(String),
    /// 11-digit personal identifier.
    Cpf(String),
}

impl DocumentoFiscal {
    /// The raw digit string.
    pub fn digitos(&self) -> &str {
        match self {
            Self::Cnpj(d) | Self::Cpf(d) => d,
        }
    }

    /// Required digit count for this identifier kind.
    pub fn largura(&self) -> usize {
        match self {
            Self::Cnpj(_) => 14,
            Self::Cpf(_) => 11,
        }
    }
}

/// Postal address as rendered inside `enderRem` / `enderDest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endereco {
    /// xLgr: street.
    pub logradouro: String,
    /// nro: street number.
    pub numero: String,
    /// xCpl: complement — omitted from the XML when blank.
    pub complemento: Option<String>,
    /// xBairro: district.
    pub bairro: String,
    /// cMun: IBGE municipality code.
    pub codigo_municipio: String,
    /// xMun: municipality name.
    pub municipio: String,
    /// UF abbreviation (e.g. "SP").
    pub uf: String,
    /// CEP: postal code. Non-digit separators are stripped on rendering.
    pub cep: String,
}

/// One declared content line (det/prod).
///
/// Immutable once attached to a document's item sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// cProd: product code.
    pub codigo: String,
    /// xProd: description.
    pub descricao: String,
    /// NCM: Mercosur tariff classification code.
    pub ncm: String,
    /// qCom: quantity, rendered with 4 decimal places.
    pub quantidade: Decimal,
    /// vUnCom: unit price, rendered with 2 decimal places.
    pub valor_unitario: Decimal,
    /// vProd: line total = quantidade × valor_unitario.
    pub valor_total: Decimal,
    /// Unit of measure (default "UN"). Data-only for the DC-e layout.
    pub unidade: String,
    /// Weight in kg. Data-only.
    pub peso: Option<Decimal>,
}

/// Document model of the DF-e family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modelo {
    /// 55 — NF-e.
    Nfe,
    /// 59 — DC-e (Declaração de Conteúdo Eletrônica).
    Dce,
    /// 65 — NFC-e.
    Nfce,
}

impl Modelo {
    /// Two-digit model code.
    pub fn code(&self) -> u8 {
        match self {
            Self::Nfe => 55,
            Self::Dce => 59,
            Self::Nfce => 65,
        }
    }

    /// Parse from the numeric model code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            55 => Some(Self::Nfe),
            59 => Some(Self::Dce),
            65 => Some(Self::Nfce),
            _ => None,
        }
    }
}

/// tpEmis — emission type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoEmissao {
    /// 1 — normal emission.
    Normal,
    /// 9 — offline contingency.
    Contingencia,
}

impl TipoEmissao {
    pub fn code(&self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Contingencia => 9,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Normal),
            9 => Some(Self::Contingencia),
            _ => None,
        }
    }
}

/// tpAmb — target environment of the authority web service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ambiente {
    /// 1 — production.
    Producao,
    /// 2 — homologation (testing).
    Homologacao,
}

impl Ambiente {
    pub fn code(&self) -> u8 {
        match self {
            Self::Producao => 1,
            Self::Homologacao => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Producao),
            2 => Some(Self::Homologacao),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modelo_codes_round_trip() {
        for m in [Modelo::Nfe, Modelo::Dce, Modelo::Nfce] {
            assert_eq!(Modelo::from_code(m.code()), Some(m));
        }
        assert_eq!(Modelo::from_code(60), None);
    }

    #[test]
    fn ambiente_codes() {
        assert_eq!(Ambiente::Producao.code(), 1);
        assert_eq!(Ambiente::Homologacao.code(), 2);
        assert_eq!(Ambiente::from_code(3), None);
    }

    #[test]
    fn documento_fiscal_widths() {
        assert_eq!(DocumentoFiscal::Cnpj("34028316000103".into()).largura(), 14);
        assert_eq!(DocumentoFiscal::Cpf("12345678901".into()).largura(), 11);
    }
}
