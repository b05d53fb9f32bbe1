use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;

/// Outcome of a charge attempt. A decline is a normal outcome, not an error;
/// only the caller decides how to surface it.
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub code: String,
    pub message: String,
}

impl ChargeOutcome {
    pub fn gateway_response(&self) -> serde_json::Value {
        serde_json::json!({ "code": self.code, "message": self.message })
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, amount: Decimal, booking_id: &str) -> anyhow::Result<ChargeOutcome>;
}

/// Simulated card-network adapter: fixed latency, ~90% approval,
/// synthetic `TXN<millis><random9>` transaction ids.
pub struct MockGateway {
    delay: Duration,
    success_rate: f64,
}

impl MockGateway {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            success_rate: 0.9,
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn charge(&self, _amount: Decimal, booking_id: &str) -> anyhow::Result<ChargeOutcome> {
        tokio::time::sleep(self.delay).await;

        let approved = rand::thread_rng().gen_bool(self.success_rate);
        if approved {
            let suffix: String = {
                let mut rng = rand::thread_rng();
                (0..9)
                    .map(|_| {
                        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
                        CHARSET[rng.gen_range(0..CHARSET.len())] as char
                    })
                    .collect()
            };
            let transaction_id = format!("TXN{}{}", Utc::now().timestamp_millis(), suffix);
            tracing::info!(booking_id = %booking_id, transaction_id = %transaction_id, "mock gateway approved charge");
            Ok(ChargeOutcome {
                success: true,
                transaction_id: Some(transaction_id),
                code: "200".to_string(),
                message: "Payment processed successfully".to_string(),
            })
        } else {
            tracing::warn!(booking_id = %booking_id, "mock gateway declined charge");
            Ok(ChargeOutcome {
                success: false,
                transaction_id: None,
                code: "400".to_string(),
                message: "Payment declined by bank".to_string(),
            })
        }
    }
}
