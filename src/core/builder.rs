use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::error::{DfeError, validation_failure};
use super::types::*;
use super::validation;

/// Builder for constructing valid DC-e documents.
///
/// ```
/// use chrono::NaiveDate;
/// use dfe::core::*;
/// use rust_decimal_macros::dec;
///
/// let emissao = NaiveDate::from_ymd_opt(2025, 12, 1)
///     .unwrap()
///     .and_hms_opt(10, 30, 0)
///     .unwrap();
///
/// let dce = DceBuilder::new(1, 35, emissao)
///     .codigo_numerico(12345678)
///     .serie(1)
///     .numero(1)
///     .ambiente(Ambiente::Homologacao)
///     .versao_aplicativo("1.0.0")
///     .remetente(
///         "34028316000103",
///         "Empresa Brasileira de Correios e Telégrafos",
///         EnderecoBuilder::new("SBN Quadra 1", "1", "Asa Norte", "5300108", "Brasília", "DF", "70002-900")
///             .build(),
///     )
///     .destinatario(
///         DocumentoFiscal::Cpf("12345678901".into()),
///         "João da Silva",
///         EnderecoBuilder::new("Rua A", "100", "Centro", "3550308", "São Paulo", "SP", "01001-000")
///             .build(),
///     )
///     .add_item(ItemBuilder::new("001", "Livro técnico", "49019900", dec!(1), dec!(10.00)).build())
///     .build()
///     .unwrap();
///
/// assert_eq!(dce.valor_total, dec!(10.00));
/// ```
pub struct DceBuilder {
    lote: u64,
    uf: u8,
    codigo_numerico: u32,
    modelo: Modelo,
    serie: u16,
    numero: u32,
    emissao: NaiveDateTime,
    tipo_emissao: TipoEmissao,
    ambiente: Ambiente,
    finalidade: u8,
    processo_emissao: u8,
    versao_aplicativo: String,
    remetente: Option<Remetente>,
    destinatario: Option<Destinatario>,
    itens: Vec<Item>,
    valor_total: Option<Decimal>,
    modalidade_frete: u8,
    codigo_rastreio: Option<String>,
    modalidade_postagem: Option<String>,
    peso_total: Option<Decimal>,
    objeto_postal: Option<String>,
}

impl DceBuilder {
    pub fn new(lote: u64, uf: u8, emissao: NaiveDateTime) -> Self {
        Self {
            lote,
            uf,
            codigo_numerico: 0,
            modelo: Modelo::Dce,
            serie: 0,
            numero: 0,
            emissao,
            tipo_emissao: TipoEmissao::Normal,
            ambiente: Ambiente::Homologacao,
            finalidade: 1,
            processo_emissao: 0,
            versao_aplicativo: String::new(),
            remetente: None,
            destinatario: None,
            itens: Vec::new(),
            valor_total: None,
            modalidade_frete: 9,
            codigo_rastreio: None,
            modalidade_postagem: None,
            peso_total: None,
            objeto_postal: None,
        }
    }

    pub fn codigo_numerico(mut self, codigo: u32) -> Self {
        self.codigo_numerico = codigo;
        self
    }

    pub fn serie(mut self, serie: u16) -> Self {
        self.serie = serie;
        self
    }

    pub fn numero(mut self, numero: u32) -> Self {
        self.numero = numero;
        self
    }

    pub fn tipo_emissao(mut self, tipo: TipoEmissao) -> Self {
        self.tipo_emissao = tipo;
        self
    }

    pub fn ambiente(mut self, ambiente: Ambiente) -> Self {
        self.ambiente = ambiente;
        self
    }

    pub fn finalidade(mut self, finalidade: u8) -> Self {
        self.finalidade = finalidade;
        self
    }

    pub fn processo_emissao(mut self, processo: u8) -> Self {
        self.processo_emissao = processo;
        self
    }

    pub fn versao_aplicativo(mut self, versao: impl Into<String>) -> Self {
        self.versao_aplicativo = versao.into();
        self
    }

    pub fn remetente(
        mut self,
        cnpj: impl Into<String>,
        nome: impl Into<String>,
        endereco: Endereco,
    ) -> Self {
        self.remetente = Some(Remetente {
            cnpj: cnpj.into(),
            nome: nome.into(),
            endereco,
        });
        self
    }

    pub fn destinatario(
        mut self,
        documento: DocumentoFiscal,
        nome: impl Into<String>,
        endereco: Endereco,
    ) -> Self {
        self.destinatario = Some(Destinatario {
            documento,
            nome: nome.into(),
            endereco,
        });
        self
    }

    /// Append an item. The item sequence is append-only; items are immutable
    /// once attached.
    pub fn add_item(mut self, item: Item) -> Self {
        self.itens.push(item);
        self
    }

    /// Override the computed document total. Normally left unset — `build()`
    /// sums the item totals.
    pub fn valor_total(mut self, valor: Decimal) -> Self {
        self.valor_total = Some(valor);
        self
    }

    pub fn modalidade_frete(mut self, modalidade: u8) -> Self {
        self.modalidade_frete = modalidade;
        self
    }

    pub fn codigo_rastreio(mut self, codigo: impl Into<String>) -> Self {
        self.codigo_rastreio = Some(codigo.into());
        self
    }

    pub fn modalidade_postagem(mut self, modalidade: impl Into<String>) -> Self {
        self.modalidade_postagem = Some(modalidade.into());
        self
    }

    pub fn peso_total(mut self, peso: Decimal) -> Self {
        self.peso_total = Some(peso);
        self
    }

    pub fn objeto_postal(mut self, objeto: impl Into<String>) -> Self {
        self.objeto_postal = Some(objeto.into());
        self
    }

    /// Validate and build the document.
    ///
    /// The document total defaults to the sum of item totals. All validation
    /// findings are reported at once.
    pub fn build(self) -> Result<Dce, DfeError> {
        let remetente = self
            .remetente
            .ok_or_else(|| DfeError::Builder("remetente is required".into()))?;
        let destinatario = self
            .destinatario
            .ok_or_else(|| DfeError::Builder("destinatario is required".into()))?;

        let valor_total = self
            .valor_total
            .unwrap_or_else(|| self.itens.iter().map(|i| i.valor_total).sum());

        let dce = Dce {
            lote: self.lote,
            uf: self.uf,
            codigo_numerico: self.codigo_numerico,
            modelo: self.modelo,
            serie: self.serie,
            numero: self.numero,
            emissao: self.emissao,
            tipo_emissao: self.tipo_emissao,
            ambiente: self.ambiente,
            finalidade: self.finalidade,
            processo_emissao: self.processo_emissao,
            versao_aplicativo: self.versao_aplicativo,
            remetente,
            destinatario,
            itens: self.itens,
            valor_total,
            modalidade_frete: self.modalidade_frete,
            codigo_rastreio: self.codigo_rastreio,
            modalidade_postagem: self.modalidade_postagem,
            peso_total: self.peso_total,
            objeto_postal: self.objeto_postal,
        };

        let errors = validation::validar(&dce);
        if !errors.is_empty() {
            return Err(validation_failure(&errors));
        }
        Ok(dce)
    }
}

/// Builder for a declared content line.
pub struct ItemBuilder {
    codigo: String,
    descricao: String,
    ncm: String,
    quantidade: Decimal,
    valor_unitario: Decimal,
    valor_total: Option<Decimal>,
    unidade: String,
    peso: Option<Decimal>,
}

impl ItemBuilder {
    pub fn new(
        codigo: impl Into<String>,
        descricao: impl Into<String>,
        ncm: impl Into<String>,
        quantidade: Decimal,
        valor_unitario: Decimal,
    ) -> Self {
        Self {
            codigo: codigo.into(),
            descricao: descricao.into(),
            ncm: ncm.into(),
            quantidade,
            valor_unitario,
            valor_total: None,
            unidade: "UN".to_string(),
            peso: None,
        }
    }

    /// Override the line total. Defaults to quantidade × valor_unitario
    /// rounded to 2 decimal places.
    pub fn valor_total(mut self, valor: Decimal) -> Self {
        self.valor_total = Some(valor);
        self
    }

    pub fn unidade(mut self, unidade: impl Into<String>) -> Self {
        self.unidade = unidade.into();
        self
    }

    pub fn peso(mut self, peso: Decimal) -> Self {
        self.peso = Some(peso);
        self
    }

    pub fn build(self) -> Item {
        let valor_total = self
            .valor_total
            .unwrap_or_else(|| (self.quantidade * self.valor_unitario).round_dp(2));
        Item {
            codigo: self.codigo,
            descricao: self.descricao,
            ncm: self.ncm,
            quantidade: self.quantidade,
            valor_unitario: self.valor_unitario,
            valor_total,
            unidade: self.unidade,
            peso: self.peso,
        }
    }
}

/// Builder for a postal address.
pub struct EnderecoBuilder {
    logradouro: String,
    numero: String,
    complemento: Option<String>,
    bairro: String,
    codigo_municipio: String,
    municipio: String,
    uf: String,
    cep: String,
}

impl EnderecoBuilder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        logradouro: impl Into<String>,
        numero: impl Into<String>,
        bairro: impl Into<String>,
        codigo_municipio: impl Into<String>,
        municipio: impl Into<String>,
        uf: impl Into<String>,
        cep: impl Into<String>,
    ) -> Self {
        Self {
            logradouro: logradouro.into(),
            numero: numero.into(),
            complemento: None,
            bairro: bairro.into(),
            codigo_municipio: codigo_municipio.into(),
            municipio: municipio.into(),
            uf: uf.into(),
            cep: cep.into(),
        }
    }

    pub fn complemento(mut self, complemento: impl Into<String>) -> Self {
        self.complemento = Some(complemento.into());
        self
    }

    pub fn build(self) -> Endereco {
        Endereco {
            logradouro: self.logradouro,
            numero: self.numero,
            complemento: self.complemento,
            bairro: self.bairro,
            codigo_municipio: self.codigo_municipio,
            municipio: self.municipio,
            uf: self.uf,
            cep: self.cep,
        }
    }
}
