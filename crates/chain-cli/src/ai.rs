use anyhow::Result;
use tracing::info;

/// Request to the external processing service. The chain core never looks
/// inside these; it only stores whatever bytes come back.
#[derive(Debug)]
pub struct AiRequest {
    pub user_id: String,
    pub operation: String,
    pub data: Vec<u8>,
}

#[derive(Debug)]
pub struct AiResponse {
    pub result: Vec<u8>,
}

/// Stand-in for the real service.
pub fn process(request: AiRequest) -> Result<AiResponse> {
    info!(
        "processing {} request for {}",
        request.operation, request.user_id
    );
    let mut result = b"Processed: ".to_vec();
    result.extend_from_slice(&request.data);
    Ok(AiResponse { result })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_echoes_the_data() {
        let response = process(AiRequest {
            user_id: "user123".into(),
            operation: "process".into(),
            data: b"Sample Data".to_vec(),
        })
        .unwrap();
        assert_eq!(response.result, b"Processed: Sample Data");
    }
}
