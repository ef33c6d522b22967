//! Two-phase payment flow: fetch a payment intent for the booking, then
//! confirm the charge through the third-party processor and report the
//! outcome back. Every failure is terminal and user-visible; nothing is
//! retried automatically.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::api::payments::{PaymentApi, PaymentRecord};
use crate::error::ApiError;
use crate::models::PaymentStatus;

#[derive(Debug, Clone, Default)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

/// Cardholder identity and address, required in full by the processor's
/// regional rules before confirmation may be attempted.
#[derive(Debug, Clone, Default)]
pub struct BillingDetails {
    pub cardholder_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// What the processor reports back from a confirmation attempt.
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    Succeeded { payment_intent_id: String },
    Failed { message: String },
    Other { status: String },
}

/// The third-party SDK seam: given the server-issued client secret and
/// the collected card/billing details, attempt the charge.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> ConfirmOutcome;
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment details are still loading")]
    IntentNotReady,

    #[error("Please provide the cardholder name and complete billing address")]
    IncompleteBilling,

    /// Processor message, surfaced verbatim.
    #[error("{0}")]
    Declined(String),

    #[error("Payment could not be completed. Please try again.")]
    Unrecognized,

    #[error("A payment attempt is already in progress")]
    Busy,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Intent phase. The card stage only renders once this is `Ready`; a
/// failed intent leaves the form stuck in `Failed` until re-initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentState {
    Pending,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub payment_intent_id: String,
    /// False when the charge went through but the status report back to
    /// the API failed; the user should refresh, not pay again.
    pub recorded: bool,
}

pub struct PaymentForm {
    booking_id: String,
    state: IntentState,
    client_secret: Option<String>,
    in_flight: bool,
}

impl PaymentForm {
    pub fn new(booking_id: impl Into<String>) -> Self {
        Self {
            booking_id: booking_id.into(),
            state: IntentState::Pending,
            client_secret: None,
            in_flight: false,
        }
    }

    pub fn state(&self) -> &IntentState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == IntentState::Ready
    }

    /// Phase one: request a payment intent for the booking and hold on to
    /// its client secret.
    pub async fn init<A: PaymentApi>(&mut self, api: &A) -> Result<(), PaymentError> {
        self.state = IntentState::Pending;
        match api.create_payment_intent(&self.booking_id).await {
            Ok(intent) => {
                self.client_secret = Some(intent.client_secret);
                self.state = IntentState::Ready;
                Ok(())
            }
            Err(error) => {
                self.client_secret = None;
                self.state = IntentState::Failed(error.user_message());
                Err(error.into())
            }
        }
    }

    /// Phase two: validate billing input, confirm with the processor, and
    /// report a successful charge back to the API on a best-effort basis.
    pub async fn submit<A, P>(
        &mut self,
        api: &A,
        processor: &P,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<PaymentConfirmation, PaymentError>
    where
        A: PaymentApi,
        P: PaymentProcessor,
    {
        if self.in_flight {
            return Err(PaymentError::Busy);
        }
        let client_secret = match (&self.state, &self.client_secret) {
            (IntentState::Ready, Some(secret)) => secret.clone(),
            _ => return Err(PaymentError::IntentNotReady),
        };
        validate_billing(billing)?;

        self.in_flight = true;
        let outcome = processor
            .confirm_card_payment(&client_secret, card, billing)
            .await;
        let result = self.settle(api, outcome).await;
        self.in_flight = false;
        result
    }

    async fn settle<A: PaymentApi>(
        &self,
        api: &A,
        outcome: ConfirmOutcome,
    ) -> Result<PaymentConfirmation, PaymentError> {
        match outcome {
            ConfirmOutcome::Succeeded { payment_intent_id } => {
                let record = PaymentRecord {
                    payment_intent_id: payment_intent_id.clone(),
                    status: PaymentStatus::Paid,
                };
                let recorded = match api.record_payment(&self.booking_id, &record).await {
                    Ok(()) => true,
                    Err(error) => {
                        // The charge already went through; a stale status
                        // is a refresh problem, never a reason to charge
                        // the card again.
                        warn!(
                            booking_id = %self.booking_id,
                            %error,
                            "payment confirmed but status update failed"
                        );
                        false
                    }
                };
                Ok(PaymentConfirmation {
                    payment_intent_id,
                    recorded,
                })
            }
            ConfirmOutcome::Failed { message } => Err(PaymentError::Declined(message)),
            ConfirmOutcome::Other { status } => {
                warn!(%status, "unrecognized confirmation status from processor");
                Err(PaymentError::Unrecognized)
            }
        }
    }
}

fn validate_billing(billing: &BillingDetails) -> Result<(), PaymentError> {
    let required = [
        &billing.cardholder_name,
        &billing.line1,
        &billing.city,
        &billing.postal_code,
        &billing.country,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(PaymentError::IncompleteBilling);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::payments::PaymentIntent;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted double for the API side of the flow.
    struct ScriptedApi {
        intent: Result<&'static str, (u16, &'static str)>,
        record_fails: bool,
        intent_calls: AtomicUsize,
        recorded: Mutex<Vec<PaymentRecord>>,
    }

    impl ScriptedApi {
        fn ready() -> Self {
            Self {
                intent: Ok("cs_test_secret"),
                record_fails: false,
                intent_calls: AtomicUsize::new(0),
                recorded: Mutex::new(Vec::new()),
            }
        }

        fn intent_failure() -> Self {
            Self {
                intent: Err((503, "Payments are temporarily unavailable")),
                ..Self::ready()
            }
        }

        fn record_failure() -> Self {
            Self {
                record_fails: true,
                ..Self::ready()
            }
        }
    }

    #[async_trait]
    impl PaymentApi for ScriptedApi {
        async fn create_payment_intent(
            &self,
            _booking_id: &str,
        ) -> Result<PaymentIntent, ApiError> {
            self.intent_calls.fetch_add(1, Ordering::SeqCst);
            match self.intent {
                Ok(secret) => Ok(PaymentIntent {
                    client_secret: secret.to_string(),
                }),
                Err((status, message)) => Err(ApiError::Api {
                    status,
                    message: message.to_string(),
                }),
            }
        }

        async fn record_payment(
            &self,
            _booking_id: &str,
            record: &PaymentRecord,
        ) -> Result<(), ApiError> {
            if self.record_fails {
                return Err(ApiError::Network("connection reset".to_string()));
            }
            self.recorded.lock().push(record.clone());
            Ok(())
        }
    }

    /// Processor double returning a fixed outcome and counting calls.
    struct ScriptedProcessor {
        outcome: ConfirmOutcome,
        calls: AtomicUsize,
    }

    impl ScriptedProcessor {
        fn new(outcome: ConfirmOutcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn succeeding() -> Self {
            Self::new(ConfirmOutcome::Succeeded {
                payment_intent_id: "pi_123".to_string(),
            })
        }
    }

    #[async_trait]
    impl PaymentProcessor for ScriptedProcessor {
        async fn confirm_card_payment(
            &self,
            _client_secret: &str,
            _card: &CardDetails,
            _billing: &BillingDetails,
        ) -> ConfirmOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn full_billing() -> BillingDetails {
        BillingDetails {
            cardholder_name: "Ada Lovelace".to_string(),
            line1: "1 Quay St".to_string(),
            line2: None,
            city: "Bristol".to_string(),
            state: None,
            postal_code: "BS1 4DB".to_string(),
            country: "GB".to_string(),
        }
    }

    #[tokio::test]
    async fn happy_path_confirms_and_records() {
        let api = ScriptedApi::ready();
        let processor = ScriptedProcessor::succeeding();
        let mut form = PaymentForm::new("bkg-1");

        form.init(&api).await.unwrap();
        assert!(form.is_ready());

        let confirmation = form
            .submit(&api, &processor, &CardDetails::default(), &full_billing())
            .await
            .unwrap();

        assert_eq!(confirmation.payment_intent_id, "pi_123");
        assert!(confirmation.recorded);
        let recorded = api.recorded.lock();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn failed_intent_blocks_the_card_stage_until_reinit() {
        let api = ScriptedApi::intent_failure();
        let processor = ScriptedProcessor::succeeding();
        let mut form = PaymentForm::new("bkg-1");

        let error = form.init(&api).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Payments are temporarily unavailable"
        );
        assert_eq!(
            form.state(),
            &IntentState::Failed("Payments are temporarily unavailable".to_string())
        );

        // Submission is refused and the processor is never reached.
        let error = form
            .submit(&api, &processor, &CardDetails::default(), &full_billing())
            .await
            .unwrap_err();
        assert!(matches!(error, PaymentError::IntentNotReady));
        assert_eq!(processor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reinit_after_failure_recovers() {
        let failing = ScriptedApi::intent_failure();
        let working = ScriptedApi::ready();
        let mut form = PaymentForm::new("bkg-1");

        assert!(form.init(&failing).await.is_err());
        form.init(&working).await.unwrap();
        assert!(form.is_ready());
    }

    #[tokio::test]
    async fn incomplete_billing_never_reaches_the_processor() {
        let api = ScriptedApi::ready();
        let processor = ScriptedProcessor::succeeding();
        let mut form = PaymentForm::new("bkg-1");
        form.init(&api).await.unwrap();

        let mut billing = full_billing();
        billing.postal_code = String::new();

        let error = form
            .submit(&api, &processor, &CardDetails::default(), &billing)
            .await
            .unwrap_err();

        assert!(matches!(error, PaymentError::IncompleteBilling));
        assert_eq!(processor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn processor_decline_surfaces_its_message_verbatim() {
        let api = ScriptedApi::ready();
        let processor = ScriptedProcessor::new(ConfirmOutcome::Failed {
            message: "Your card was declined".to_string(),
        });
        let mut form = PaymentForm::new("bkg-1");
        form.init(&api).await.unwrap();

        let error = form
            .submit(&api, &processor, &CardDetails::default(), &full_billing())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Your card was declined");
        // Still ready; the user may correct the card and try again.
        assert!(form.is_ready());
        assert!(api.recorded.lock().is_empty());
    }

    #[tokio::test]
    async fn unknown_processor_status_maps_to_generic_failure() {
        let api = ScriptedApi::ready();
        let processor = ScriptedProcessor::new(ConfirmOutcome::Other {
            status: "requires_action".to_string(),
        });
        let mut form = PaymentForm::new("bkg-1");
        form.init(&api).await.unwrap();

        let error = form
            .submit(&api, &processor, &CardDetails::default(), &full_billing())
            .await
            .unwrap_err();

        assert!(matches!(error, PaymentError::Unrecognized));
    }

    #[tokio::test]
    async fn record_failure_still_counts_as_a_successful_payment() {
        let api = ScriptedApi::record_failure();
        let processor = ScriptedProcessor::succeeding();
        let mut form = PaymentForm::new("bkg-1");
        form.init(&api).await.unwrap();

        let confirmation = form
            .submit(&api, &processor, &CardDetails::default(), &full_billing())
            .await
            .unwrap();

        // The charge succeeded; only the bookkeeping is stale.
        assert_eq!(confirmation.payment_intent_id, "pi_123");
        assert!(!confirmation.recorded);
    }

    #[tokio::test]
    async fn busy_form_refuses_overlapping_submission() {
        let api = ScriptedApi::ready();
        let processor = ScriptedProcessor::succeeding();
        let mut form = PaymentForm::new("bkg-1");
        form.init(&api).await.unwrap();
        form.in_flight = true;

        let error = form
            .submit(&api, &processor, &CardDetails::default(), &full_billing())
            .await
            .unwrap_err();

        assert!(matches!(error, PaymentError::Busy));
        assert_eq!(processor.calls.load(Ordering::SeqCst), 0);
    }
}
