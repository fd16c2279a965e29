use chrono::{NaiveDate, NaiveDateTime};
use dfe::core::*;
use rust_decimal_macros::dec;

fn emissao(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn endereco_remetente() -> Endereco {
    EnderecoBuilder::new(
        "SBN Quadra 1 Bloco A",
        "1",
        "Asa Norte",
        "5300108",
        "Brasília",
        "DF",
        "70002-900",
    )
    .build()
}

fn endereco_destinatario() -> Endereco {
    EnderecoBuilder::new(
        "Rua Augusta",
        "1500",
        "Consolação",
        "3550308",
        "São Paulo",
        "SP",
        "01304-001",
    )
    .complemento("Apto 42")
    .build()
}

fn dce_valida() -> DceBuilder {
    DceBuilder::new(1, 35, emissao(2025, 12, 1))
        .codigo_numerico(12345678)
        .serie(1)
        .numero(1)
        .ambiente(Ambiente::Homologacao)
        .versao_aplicativo("1.0.0")
        .remetente(
            "34028316000103",
            "Empresa Brasileira de Correios e Telégrafos",
            endereco_remetente(),
        )
        .destinatario(
            DocumentoFiscal::Cpf("12345678901".into()),
            "João da Silva",
            endereco_destinatario(),
        )
        .add_item(ItemBuilder::new("001", "Livro técnico", "49019900", dec!(1), dec!(10.00)).build())
}

// --- Builder ---

#[test]
fn builder_happy_path_defaults() {
    let dce = dce_valida().build().unwrap();
    assert_eq!(dce.modelo, Modelo::Dce);
    assert_eq!(dce.modelo.code(), 59);
    assert_eq!(dce.tipo_emissao, TipoEmissao::Normal);
    assert_eq!(dce.finalidade, 1);
    assert_eq!(dce.processo_emissao, 0);
    assert_eq!(dce.modalidade_frete, 9);
    assert_eq!(dce.valor_total, dec!(10.00));
}

#[test]
fn builder_sums_item_totals() {
    let dce = dce_valida()
        .add_item(ItemBuilder::new("002", "Caneta", "96081000", dec!(3), dec!(2.50)).build())
        .add_item(ItemBuilder::new("003", "Caderno", "48201000", dec!(2), dec!(7.25)).build())
        .build()
        .unwrap();
    assert_eq!(dce.itens.len(), 3);
    assert_eq!(dce.valor_total, dec!(32.00));
}

#[test]
fn item_builder_computes_line_total() {
    let item = ItemBuilder::new("001", "Parafuso", "73181500", dec!(2.5), dec!(0.40)).build();
    assert_eq!(item.valor_total, dec!(1.00));
    assert_eq!(item.unidade, "UN");
    assert!(item.peso.is_none());
}

#[test]
fn builder_requires_parties() {
    let err = DceBuilder::new(1, 35, emissao(2025, 12, 1))
        .versao_aplicativo("1.0.0")
        .build()
        .unwrap_err();
    assert!(matches!(err, DfeError::Builder(_)));
}

// --- Validation ---

#[test]
fn validation_rejects_empty_items() {
    let err = DceBuilder::new(1, 35, emissao(2025, 12, 1))
        .codigo_numerico(1)
        .versao_aplicativo("1.0.0")
        .remetente("34028316000103", "Correios", endereco_remetente())
        .destinatario(
            DocumentoFiscal::Cpf("12345678901".into()),
            "João",
            endereco_destinatario(),
        )
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("itens"));
}

#[test]
fn validation_rejects_unassigned_uf_codes() {
    // IBGE numbering has gaps; in-range values are not all assigned
    for gap in [18, 20, 38, 44] {
        let err = DceBuilder::new(1, gap, emissao(2025, 12, 1))
            .codigo_numerico(12_345_678)
            .versao_aplicativo("1.0.0")
            .remetente("34028316000103", "Correios", endereco_remetente())
            .destinatario(
                DocumentoFiscal::Cpf("12345678901".into()),
                "João",
                endereco_destinatario(),
            )
            .add_item(ItemBuilder::new("001", "Livro", "49019900", dec!(1), dec!(10.00)).build())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("uf"), "cUF {gap}");
    }
    assert!(validation::uf_valida(35));
    assert!(!validation::uf_valida(30));
}

#[test]
fn validation_rejects_bad_cnpj() {
    let err = dce_valida()
        .remetente("123", "Correios", endereco_remetente())
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("remetente.cnpj"));
}

#[test]
fn validation_rejects_bad_cpf_width() {
    let err = dce_valida()
        .destinatario(
            DocumentoFiscal::Cpf("123".into()),
            "João",
            endereco_destinatario(),
        )
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("destinatario.cpf"));
}

#[test]
fn validation_rejects_total_mismatch() {
    let err = dce_valida().valor_total(dec!(999.99)).build().unwrap_err();
    assert!(err.to_string().contains("valor_total"));
}

#[test]
fn validation_rejects_line_total_mismatch() {
    let item = ItemBuilder::new("001", "Livro", "49019900", dec!(2), dec!(10.00))
        .valor_total(dec!(15.00))
        .build();
    let err = dce_valida()
        .add_item(item)
        .valor_total(dec!(25.00))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("valor_total"));
}

#[test]
fn validation_collects_all_errors() {
    let dce = Dce {
        lote: 1,
        uf: 99,
        codigo_numerico: 100_000_000,
        modelo: Modelo::Dce,
        serie: 1000,
        numero: 1,
        emissao: emissao(2025, 12, 1),
        tipo_emissao: TipoEmissao::Normal,
        ambiente: Ambiente::Homologacao,
        finalidade: 1,
        processo_emissao: 0,
        versao_aplicativo: String::new(),
        remetente: Remetente {
            cnpj: "123".into(),
            nome: String::new(),
            endereco: endereco_remetente(),
        },
        destinatario: Destinatario {
            documento: DocumentoFiscal::Cpf("12345678901".into()),
            nome: "João".into(),
            endereco: endereco_destinatario(),
        },
        itens: vec![],
        valor_total: dec!(0),
        modalidade_frete: 9,
        codigo_rastreio: None,
        modalidade_postagem: None,
        peso_total: None,
        objeto_postal: None,
    };
    let errors = validar(&dce);
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"uf"));
    assert!(fields.contains(&"serie"));
    assert!(fields.contains(&"codigo_numerico"));
    assert!(fields.contains(&"versao_aplicativo"));
    assert!(fields.contains(&"remetente.cnpj"));
    assert!(fields.contains(&"remetente.nome"));
    assert!(fields.contains(&"itens"));
}

#[test]
fn validation_rejects_malformed_cep() {
    let endereco = EnderecoBuilder::new(
        "Rua A", "1", "Centro", "3550308", "São Paulo", "SP", "123",
    )
    .build();
    let err = dce_valida()
        .destinatario(
            DocumentoFiscal::Cpf("12345678901".into()),
            "João",
            endereco,
        )
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("cep"));
}

// --- Access key ---

#[test]
fn chave_matches_reference_scenario() {
    // UF 35, 2025-12, CNPJ 34028316000103, model 59, series 1, number 1,
    // normal emission, numeric code 12345678.
    let dce = dce_valida().build().unwrap();
    let chave = ChaveAcesso::gerar(&dce).unwrap();
    assert_eq!(chave.as_str(), "35251234028316000103590010000000011123456786");
    assert_eq!(chave.digito_verificador(), '6');
}

#[test]
fn chave_is_deterministic() {
    let dce = dce_valida().build().unwrap();
    let a = ChaveAcesso::gerar(&dce).unwrap();
    let b = ChaveAcesso::gerar(&dce).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_str().len(), 44);
    assert!(a.as_str().bytes().all(|b| b.is_ascii_digit()));
}

#[test]
fn chave_embeds_zero_padded_fields() {
    let dce = dce_valida().build().unwrap();
    let chave = ChaveAcesso::gerar(&dce).unwrap();
    let s = chave.as_str();
    assert_eq!(&s[0..2], "35"); // UF
    assert_eq!(&s[2..6], "2512"); // AAMM
    assert_eq!(&s[6..20], "34028316000103"); // CNPJ
    assert_eq!(&s[20..22], "59"); // model
    assert_eq!(&s[22..25], "001"); // series
    assert_eq!(&s[25..34], "000000001"); // number
    assert_eq!(&s[34..35], "1"); // emission type
    assert_eq!(&s[35..43], "12345678"); // numeric code
}

#[test]
fn chave_rejects_short_cnpj_instead_of_padding() {
    // A Dce built by hand can carry an invalid CNPJ; key generation must
    // refuse it rather than zero-pad.
    let mut dce = dce_valida().build().unwrap();
    dce.remetente.cnpj = "340283".into();
    let err = ChaveAcesso::gerar(&dce).unwrap_err();
    assert!(matches!(err, DfeError::Chave(_)));
    assert!(err.to_string().contains("14 digits"));
}

#[test]
fn chave_dv_consistent_with_calcular_dv() {
    let dce = dce_valida().numero(777).codigo_numerico(42).build().unwrap();
    let chave = ChaveAcesso::gerar(&dce).unwrap();
    let (corpo, dv) = chave.as_str().split_at(43);
    assert_eq!(calcular_dv(corpo).unwrap().to_string(), dv);
}
