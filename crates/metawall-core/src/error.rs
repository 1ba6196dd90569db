use thiserror::Error;

/// Erros comuns da biblioteca Metawall
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transação de entrada inválida ou mal formada
    #[error("Entrada inválida: {0}")]
    InputError(String),

    /// Falha de comunicação com um serviço externo
    #[error("Erro de transporte: {0}")]
    TransportError(String),

    /// Erro de decodificação de dados
    #[error("Erro de decodificação: {0}")]
    DecodeError(String),

    /// Consulta de nome não concluída dentro do limite de tentativas
    #[error("Timeout de resolução: {0}")]
    ResolutionTimeout(String),

    /// Falha ao enriquecer um evento de NFT
    #[error("Erro de enriquecimento: {0}")]
    EnrichmentError(String),

    /// Erro genérico
    #[error("{0}")]
    Other(String),
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;
