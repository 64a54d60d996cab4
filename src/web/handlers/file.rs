//! Upload and delete handlers.
//!
//! Every endpoint resolves a [`Scope`] and hands off to one shared routine,
//! so the three upload variants and two delete variants only differ in the
//! scope and the confirmation message.

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, Path, State,
    },
    Json,
};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::file::{Scope, StoredFile};
use crate::web::dto::{MessageResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::router::STATIC_PREFIX;
use crate::UploadError;

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

const UPLOAD_MESSAGE: &str = "Upload realizado com sucesso!";
const USER_UPLOAD_MESSAGE: &str = "Usuário criado e arquivo salvo com sucesso!";
const PROTOCOL_UPLOAD_MESSAGE: &str = "Arquivo salvo com sucesso na pasta do protocolo!";
const DELETE_MESSAGE: &str = "Arquivo deletado com sucesso!";
const USER_DELETE_MESSAGE: &str = "Arquivo do usuário deletado com sucesso!";

const NO_FILE_MESSAGE: &str = "Nenhum arquivo enviado.";
const NOT_FOUND_MESSAGE: &str = "Arquivo não encontrado.";
const INVALID_NAME_MESSAGE: &str = "Nome inválido.";
const STORE_ERROR_MESSAGE: &str = "Erro ao salvar o arquivo.";
const DELETE_ERROR_MESSAGE: &str = "Erro ao deletar o arquivo.";

/// POST /upload - Upload a file into the root scope.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    receive_upload(&state, Scope::Root, multipart, UPLOAD_MESSAGE).await
}

/// POST /upload/users - Upload a file into the users scope.
pub async fn upload_user_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    receive_upload(&state, Scope::Users, multipart, USER_UPLOAD_MESSAGE).await
}

/// POST /upload/protocol/:protocolo - Upload a file into a protocol scope.
pub async fn upload_protocol_file(
    State(state): State<Arc<AppState>>,
    Path(protocolo): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let scope = Scope::protocol(&protocolo).map_err(|_| {
        tracing::warn!(protocolo = %protocolo, "Rejected protocol identifier");
        ApiError::bad_request(INVALID_NAME_MESSAGE)
    })?;

    receive_upload(&state, scope, multipart, PROTOCOL_UPLOAD_MESSAGE).await
}

/// DELETE /upload/delete/:filename - Delete a file from the root scope.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    remove_file(&state, Scope::Root, &filename, DELETE_MESSAGE).await
}

/// DELETE /upload/users/:filename - Delete a file from the users scope.
pub async fn delete_user_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    remove_file(&state, Scope::Users, &filename, USER_DELETE_MESSAGE).await
}

/// Store the first `file` part of the body into `scope`.
///
/// Parts with another name, and `file` parts without a filename, are skipped.
/// A body that is not `multipart/form-data` carries no file at all and is
/// answered like an empty form.
async fn receive_upload(
    state: &AppState,
    scope: Scope,
    multipart: Result<Multipart, MultipartRejection>,
    message: &str,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(scope = %scope, reason = %e, "Upload request is not multipart");
        ApiError::bad_request(NO_FILE_MESSAGE)
    })?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| state.parse_error(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let stored = store_field(state, &scope, &original_name, &mut field).await?;
        let file_url = stored.url(&state.public_url, STATIC_PREFIX);

        tracing::info!(
            scope = %scope,
            original = %original_name,
            stored = %stored.name,
            "File uploaded"
        );

        return Ok(Json(UploadResponse::new(message, file_url)));
    }

    Err(ApiError::bad_request(NO_FILE_MESSAGE))
}

/// Stream a multipart field into a newly named file.
async fn store_field(
    state: &AppState,
    scope: &Scope,
    original_name: &str,
    field: &mut Field<'_>,
) -> Result<StoredFile, ApiError> {
    let (stored, mut file) = state
        .storage
        .create(scope, original_name)
        .await
        .map_err(|e| {
            tracing::error!(scope = %scope, error = %e, "Failed to create upload file");
            ApiError::internal(STORE_ERROR_MESSAGE)
        })?;

    match write_field(state, field, &mut file).await {
        Ok(_) => Ok(stored),
        Err(err) => {
            drop(file);
            state.storage.discard(&stored).await;
            Err(err)
        }
    }
}

async fn write_field(
    state: &AppState,
    field: &mut Field<'_>,
    file: &mut File,
) -> Result<u64, ApiError> {
    let write_error = |e: std::io::Error| {
        tracing::error!(error = %e, "Failed to write upload file");
        ApiError::internal(STORE_ERROR_MESSAGE)
    };

    let mut written = 0u64;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| state.parse_error(e.to_string()))?
    {
        file.write_all(&chunk).await.map_err(write_error)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(write_error)?;

    Ok(written)
}

/// Delete `filename` from `scope`.
async fn remove_file(
    state: &AppState,
    scope: Scope,
    filename: &str,
    message: &str,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.storage.delete(&scope, filename).await {
        Ok(()) => {
            tracing::info!(scope = %scope, filename = %filename, "File deleted");
            Ok(Json(MessageResponse::new(message)))
        }
        Err(UploadError::InvalidName(_)) => {
            tracing::warn!(scope = %scope, filename = %filename, "Rejected filename");
            Err(ApiError::bad_request(INVALID_NAME_MESSAGE))
        }
        Err(UploadError::NotFound(_)) => Err(ApiError::not_found(NOT_FOUND_MESSAGE)),
        Err(e) => {
            tracing::error!(scope = %scope, filename = %filename, error = %e, "Failed to delete file");
            Err(ApiError::internal(DELETE_ERROR_MESSAGE))
        }
    }
}
