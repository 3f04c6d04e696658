//! Process parsing from JSON/YAML.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::timestamp;

/// Errors that can occur when parsing processes.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to read process file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Process validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// A document attached to the process record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,

    /// When the document was filed
    #[serde(default, with = "timestamp::optional")]
    pub data_hora_juntada: Option<DateTime<Utc>>,

    /// Document title as registered by the court
    pub nome: String,

    /// Full extracted text
    pub texto: String,
}

impl Document {
    /// Name and text joined, as scanned by the document rules.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.nome, self.texto)
    }
}

/// A docket movement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    #[serde(default, with = "timestamp::optional")]
    pub data_hora: Option<DateTime<Utc>>,

    pub descricao: String,
}

/// A legal process submitted for evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    /// Case number (CNJ format in practice, not enforced)
    pub numero_processo: String,

    #[serde(default)]
    pub classe: Option<String>,

    /// Court body
    #[serde(default)]
    pub orgao_julgador: Option<String>,

    #[serde(default, with = "timestamp::optional")]
    pub ultima_distribuicao: Option<DateTime<Utc>>,

    #[serde(default)]
    pub assunto: Option<String>,

    #[serde(default)]
    pub segredo_justica: Option<bool>,

    #[serde(default)]
    pub justica_gratuita: Option<bool>,

    /// Court acronym, e.g. "TJSP" or "TRT2"
    #[serde(default)]
    pub sigla_tribunal: Option<String>,

    /// Legal sphere, e.g. "civel", "trabalhista"
    #[serde(default)]
    pub esfera: Option<String>,

    /// Condemnation value. `None` means "not informed", which differs from zero.
    #[serde(default)]
    pub valor_condenacao: Option<f64>,

    #[serde(default)]
    pub documentos: Vec<Document>,

    #[serde(default)]
    pub movimentos: Vec<Movement>,
}

impl Process {
    /// Start a process with only the case number set.
    pub fn new(numero_processo: impl Into<String>) -> Self {
        Self {
            numero_processo: numero_processo.into(),
            classe: None,
            orgao_julgador: None,
            ultima_distribuicao: None,
            assunto: None,
            segredo_justica: None,
            justica_gratuita: None,
            sigla_tribunal: None,
            esfera: None,
            valor_condenacao: None,
            documentos: Vec::new(),
            movimentos: Vec::new(),
        }
    }

    /// Parse a process from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProcessError> {
        let process: Process = serde_yaml::from_str(yaml)?;
        process.validate()?;
        Ok(process)
    }

    /// Parse a process from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProcessError> {
        let process: Process = serde_json::from_str(json)?;
        process.validate()?;
        Ok(process)
    }

    /// Parse a process from a file, picking the format by extension.
    ///
    /// `.yaml` and `.yml` are read as YAML; anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProcessError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// Validate the process invariants.
    ///
    /// Runs before the rule engine; the engine assumes a valid process.
    pub fn validate(&self) -> Result<(), ProcessError> {
        if self.numero_processo.trim().is_empty() {
            return Err(ProcessError::MissingField("numeroProcesso".to_string()));
        }

        if let Some(value) = self.valor_condenacao {
            if !value.is_finite() {
                return Err(ProcessError::ValidationError(
                    "valorCondenacao must be a finite number".to_string(),
                ));
            }
            if value < 0.0 {
                return Err(ProcessError::ValidationError(format!(
                    "valorCondenacao must be non-negative, got {}",
                    value
                )));
            }
        }

        Ok(())
    }

    /// Builder-style helpers, mostly for tests and fixtures.
    pub fn with_esfera(mut self, esfera: impl Into<String>) -> Self {
        self.esfera = Some(esfera.into());
        self
    }

    pub fn with_sigla_tribunal(mut self, sigla: impl Into<String>) -> Self {
        self.sigla_tribunal = Some(sigla.into());
        self
    }

    pub fn with_valor(mut self, valor: f64) -> Self {
        self.valor_condenacao = Some(valor);
        self
    }

    pub fn with_document(mut self, nome: impl Into<String>, texto: impl Into<String>) -> Self {
        let id = format!("doc-{}", self.documentos.len() + 1);
        self.documentos.push(Document {
            id,
            data_hora_juntada: None,
            nome: nome.into(),
            texto: texto.into(),
        });
        self
    }

    pub fn with_movement(mut self, descricao: impl Into<String>) -> Self {
        self.movimentos.push(Movement {
            data_hora: None,
            descricao: descricao.into(),
        });
        self
    }
}
