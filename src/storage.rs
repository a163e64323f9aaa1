use crate::errors::AlertError;
use crate::models::Apartment;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_apartments(path: &Path) -> Vec<Apartment> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(apartments) => apartments,
            Err(err) => {
                error!("failed to parse apartments file: {err}");
                Vec::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => {
            error!("failed to read apartments file: {err}");
            Vec::new()
        }
    }
}

/// Rewrites the whole collection, including when it is empty.
pub async fn persist_apartments(path: &Path, apartments: &[Apartment]) -> Result<(), AlertError> {
    let payload = serde_json::to_vec_pretty(apartments)
        .map_err(|err| AlertError::Storage(format!("failed to encode apartments: {err}")))?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("alert_map_{name}_{}_{nanos}.json", std::process::id()));
        path
    }

    fn apartment(id: &str) -> Apartment {
        Apartment {
            id: id.to_string(),
            address: "Herzl 1".to_string(),
            contact_name: "Dana".to_string(),
            contact_phone: "972500000000".to_string(),
            price: 5000.0,
            rooms: 3.0,
            size: 70.0,
            floor: 1,
            details: String::new(),
            lat: 32.0,
            lng: 34.8,
            notes: vec!["nice".to_string()],
            is_irrelevant: true,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        assert!(load_apartments(&temp_path("missing")).await.is_empty());
    }

    #[tokio::test]
    async fn persisted_apartments_load_back() {
        let path = temp_path("roundtrip");
        let apartments = vec![apartment("1"), apartment("2")];
        persist_apartments(&path, &apartments).await.unwrap();
        assert_eq!(load_apartments(&path).await, apartments);

        persist_apartments(&path, &[]).await.unwrap();
        assert!(load_apartments(&path).await.is_empty());
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn persist_failure_is_a_server_error() {
        let mut path = temp_path("no_such_dir");
        path.push("apartments.json");
        let err = persist_apartments(&path, &[apartment("1")]).await.unwrap_err();
        assert!(matches!(err, AlertError::Io(_)));
        assert_eq!(
            crate::errors::AppError::from(err).status,
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(load_apartments(&path).await.is_empty());
        let _ = std::fs::remove_file(path);
    }
}
