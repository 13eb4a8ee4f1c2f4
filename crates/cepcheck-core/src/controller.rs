//! Lookup controller: validates the typed CEP, drives the submit control
//! through `idle -> busy -> idle`, runs one lookup and hands the classified
//! result to the view.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cep::{clean_cep, CepLookup, ResultPayload, ViaCepResponse, CEP_DIGITS};
use crate::config::ServiceConfig;

/// UI collaborators the controller drives
///
/// `enter_busy` disables the submit control and shows the checking label;
/// `leave_busy` re-enables it with its default label.
pub trait LookupView: Send {
    fn enter_busy(&mut self);
    fn leave_busy(&mut self);
    fn hide_result(&mut self);
    fn show_result(&mut self, payload: &ResultPayload);
}

/// Which addresses are served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePolicy {
    pub supported_uf: String,
    pub region_name: String,
}

impl ServicePolicy {
    pub fn new(supported_uf: impl Into<String>, region_name: impl Into<String>) -> Self {
        Self {
            supported_uf: supported_uf.into(),
            region_name: region_name.into(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.supported_uf.clone(), config.region_name.clone())
    }

    pub fn serves(&self, uf: Option<&str>) -> bool {
        uf == Some(self.supported_uf.as_str())
    }
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self::from_config(&ServiceConfig::default())
    }
}

/// How a submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another lookup was in flight; nothing happened
    Rejected,
    /// Cleaned code did not have eight digits; no request was made
    Invalid,
    NotFound,
    Served,
    NotServed,
    /// Transport or parse failure
    Failed,
}

/// Map an API response onto the result shown to the user
pub fn classify(response: &ViaCepResponse, policy: &ServicePolicy) -> (SubmitOutcome, ResultPayload) {
    if response.is_not_found() {
        return (SubmitOutcome::NotFound, ResultPayload::not_found());
    }

    let address = response.address();
    if policy.serves(response.uf.as_deref()) {
        (SubmitOutcome::Served, ResultPayload::served(&address))
    } else {
        (
            SubmitOutcome::NotServed,
            ResultPayload::not_served(&address, &policy.region_name),
        )
    }
}

pub struct LookupController<L> {
    lookup: L,
    policy: ServicePolicy,
    in_flight: AtomicBool,
}

impl<L: CepLookup> LookupController<L> {
    pub fn new(lookup: L, policy: ServicePolicy) -> Self {
        Self {
            lookup,
            policy,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a lookup is currently running
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Handle one submit action for the raw input value
    pub async fn submit<V>(&self, raw: &str, view: &mut V) -> SubmitOutcome
    where
        V: LookupView + ?Sized,
    {
        let Some(_slot) = InFlightSlot::acquire(&self.in_flight) else {
            tracing::debug!("Submit ignored, a lookup is already in flight");
            return SubmitOutcome::Rejected;
        };

        let cep = clean_cep(raw);
        if cep.len() != CEP_DIGITS {
            tracing::debug!("Rejecting CEP with {} digits", cep.len());
            view.show_result(&ResultPayload::invalid_cep());
            return SubmitOutcome::Invalid;
        }

        let mut view = BusyGuard::enter(view);
        view.hide_result();

        tracing::debug!("Looking up CEP {}", cep);
        let (outcome, payload) = match self.lookup.lookup(&cep).await {
            Ok(response) => classify(&response, &self.policy),
            Err(e) => {
                tracing::warn!("Lookup for CEP {} failed: {}", cep, e);
                (SubmitOutcome::Failed, ResultPayload::lookup_failed())
            }
        };

        view.show_result(&payload);
        tracing::info!("CEP {} checked: {:?}", cep, outcome);

        outcome
    }
}

/// Single-slot guard over the in-flight flag
struct InFlightSlot<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Holds the view busy; restores the idle state exactly once when dropped,
/// whether the submission returned, was cancelled, or the view panicked
struct BusyGuard<'a, V: LookupView + ?Sized> {
    view: &'a mut V,
}

impl<'a, V: LookupView + ?Sized> BusyGuard<'a, V> {
    fn enter(view: &'a mut V) -> Self {
        view.enter_busy();
        Self { view }
    }
}

impl<V: LookupView + ?Sized> Deref for BusyGuard<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        self.view
    }
}

impl<V: LookupView + ?Sized> DerefMut for BusyGuard<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        self.view
    }
}

impl<V: LookupView + ?Sized> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        self.view.leave_busy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cep::Category;
    use crate::{Error, Result};
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Canned lookup that counts calls
    struct FakeLookup {
        reply: Box<dyn Fn() -> Result<ViaCepResponse> + Send + Sync>,
        calls: Arc<AtomicUsize>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeLookup {
        fn replying(reply: impl Fn() -> Result<ViaCepResponse> + Send + Sync + 'static) -> Self {
            Self {
                reply: Box::new(reply),
                calls: Arc::new(AtomicUsize::new(0)),
                gate: None,
            }
        }

        fn with_uf(uf: &'static str, localidade: &'static str) -> Self {
            Self::replying(move || {
                Ok(ViaCepResponse {
                    cep: Some("01310-930".to_string()),
                    logradouro: Some("Rua Teste".to_string()),
                    bairro: Some("Centro".to_string()),
                    localidade: Some(localidade.to_string()),
                    uf: Some(uf.to_string()),
                    erro: None,
                })
            })
        }
    }

    #[async_trait::async_trait]
    impl CepLookup for FakeLookup {
        async fn lookup(&self, _cep: &str) -> Result<ViaCepResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.reply)()
        }
    }

    #[derive(Debug, Default)]
    struct ViewState {
        disabled: bool,
        label_busy: bool,
        busy_entries: usize,
        busy_exits: usize,
        visible: bool,
        shown: Vec<ResultPayload>,
    }

    #[derive(Clone, Default)]
    struct RecordingView {
        state: Arc<Mutex<ViewState>>,
        panic_on_show: bool,
    }

    impl RecordingView {
        fn state(&self) -> std::sync::MutexGuard<'_, ViewState> {
            self.state.lock().unwrap_or_else(|e| e.into_inner())
        }

        fn last_category(&self) -> Option<Category> {
            self.state().shown.last().map(|p| p.category)
        }
    }

    impl LookupView for RecordingView {
        fn enter_busy(&mut self) {
            let mut state = self.state();
            state.disabled = true;
            state.label_busy = true;
            state.busy_entries += 1;
        }

        fn leave_busy(&mut self) {
            let mut state = self.state();
            state.disabled = false;
            state.label_busy = false;
            state.busy_exits += 1;
        }

        fn hide_result(&mut self) {
            self.state().visible = false;
        }

        fn show_result(&mut self, payload: &ResultPayload) {
            if self.panic_on_show {
                panic!("renderer failed");
            }
            let mut state = self.state();
            state.visible = true;
            state.shown.push(payload.clone());
        }
    }

    fn assert_idle(view: &RecordingView) {
        let state = view.state();
        assert!(!state.disabled, "submit control left disabled");
        assert!(!state.label_busy, "submit control kept the checking label");
        assert_eq!(state.busy_entries, state.busy_exits);
    }

    #[tokio::test]
    async fn test_short_code_is_invalid_without_network() {
        let lookup = FakeLookup::with_uf("SP", "São Paulo");
        let calls = lookup.calls.clone();
        let controller = LookupController::new(lookup, ServicePolicy::default());
        let mut view = RecordingView::default();

        let outcome = controller.submit("0131093", &mut view).await;

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(view.last_category(), Some(Category::Error));
        assert_eq!(view.state().shown[0], ResultPayload::invalid_cep());
        assert_eq!(view.state().busy_entries, 0);
        assert_idle(&view);
    }

    #[tokio::test]
    async fn test_other_lengths_are_invalid() {
        for raw in ["", "abc", "01310-93", "013109301", "0131 0930 1"] {
            let lookup = FakeLookup::with_uf("SP", "São Paulo");
            let calls = lookup.calls.clone();
            let controller = LookupController::new(lookup, ServicePolicy::default());
            let mut view = RecordingView::default();

            assert_eq!(controller.submit(raw, &mut view).await, SubmitOutcome::Invalid, "{raw:?}");
            assert_eq!(calls.load(Ordering::SeqCst), 0, "{raw:?}");
        }
    }

    #[tokio::test]
    async fn test_served_region() {
        let lookup = FakeLookup::with_uf("SP", "São Paulo");
        let calls = lookup.calls.clone();
        let controller = LookupController::new(lookup, ServicePolicy::default());
        let mut view = RecordingView::default();

        let outcome = controller.submit("01310-930", &mut view).await;

        assert_eq!(outcome, SubmitOutcome::Served);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let state = view.state();
        assert_eq!(state.shown.len(), 1);
        assert_eq!(state.shown[0].category, Category::Success);
        assert!(state.shown[0].message.contains("Atendemos sua região!"));
        assert!(state.shown[0].message.contains("Rua Teste"));
        assert!(state.visible);
        assert_eq!(state.busy_entries, 1);
        drop(state);
        assert_idle(&view);
    }

    #[tokio::test]
    async fn test_other_region_is_info() {
        let controller = LookupController::new(
            FakeLookup::with_uf("RJ", "Rio de Janeiro"),
            ServicePolicy::default(),
        );
        let mut view = RecordingView::default();

        let outcome = controller.submit("20040020", &mut view).await;

        assert_eq!(outcome, SubmitOutcome::NotServed);
        assert_eq!(view.last_category(), Some(Category::Info));
        assert!(view.state().shown[0].message.contains("RJ"));
        assert!(view.state().shown[0].message.contains("Rio de Janeiro/RJ"));
        assert_idle(&view);
    }

    #[tokio::test]
    async fn test_not_found() {
        let lookup = FakeLookup::replying(|| {
            Ok(serde_json::from_str(r#"{"erro": true}"#).unwrap())
        });
        let controller = LookupController::new(lookup, ServicePolicy::default());
        let mut view = RecordingView::default();

        let outcome = controller.submit("99999999", &mut view).await;

        assert_eq!(outcome, SubmitOutcome::NotFound);
        assert_eq!(view.state().shown[0], ResultPayload::not_found());
        assert_idle(&view);
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let lookup = FakeLookup::replying(|| Err(Error::Other("connection refused".to_string())));
        let controller = LookupController::new(lookup, ServicePolicy::default());
        let mut view = RecordingView::default();

        let outcome = controller.submit("01310930", &mut view).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        let shown = view.state().shown[0].clone();
        assert_eq!(shown, ResultPayload::lookup_failed());
        assert!(!shown.message.contains("connection refused"));
        assert_idle(&view);
    }

    #[tokio::test]
    async fn test_previous_result_hidden_while_busy() {
        let gate = Arc::new(Notify::new());
        let mut lookup = FakeLookup::with_uf("SP", "São Paulo");
        lookup.gate = Some(gate.clone());
        let controller = Arc::new(LookupController::new(lookup, ServicePolicy::default()));

        let view = RecordingView::default();
        view.state().visible = true;

        let task = {
            let controller = controller.clone();
            let mut view = view.clone();
            tokio::spawn(async move { controller.submit("01310930", &mut view).await })
        };

        // Wait until the lookup is parked on the gate
        while !controller.is_in_flight() || view.state().busy_entries == 0 {
            tokio::task::yield_now().await;
        }
        {
            let state = view.state();
            assert!(state.disabled);
            assert!(state.label_busy);
            assert!(!state.visible);
        }

        gate.notify_one();
        assert_eq!(task.await.unwrap(), SubmitOutcome::Served);
        assert!(view.state().visible);
        assert_idle(&view);
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_rejected() {
        let gate = Arc::new(Notify::new());
        let mut lookup = FakeLookup::with_uf("SP", "São Paulo");
        lookup.gate = Some(gate.clone());
        let calls = lookup.calls.clone();
        let controller = Arc::new(LookupController::new(lookup, ServicePolicy::default()));

        let view = RecordingView::default();
        let first = {
            let controller = controller.clone();
            let mut view = view.clone();
            tokio::spawn(async move { controller.submit("01310930", &mut view).await })
        };
        while !controller.is_in_flight() {
            tokio::task::yield_now().await;
        }

        let mut second_view = RecordingView::default();
        let second = controller.submit("01310930", &mut second_view).await;
        assert_eq!(second, SubmitOutcome::Rejected);
        assert!(second_view.state().shown.is_empty());
        assert_eq!(second_view.state().busy_entries, 0);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Served);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The slot is free again; store a permit so the gate lets it through
        gate.notify_one();
        let mut third_view = RecordingView::default();
        assert_eq!(controller.submit("01310930", &mut third_view).await, SubmitOutcome::Served);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_idle_restored_when_renderer_panics() {
        let controller = Arc::new(LookupController::new(
            FakeLookup::with_uf("SP", "São Paulo"),
            ServicePolicy::default(),
        ));
        let view = RecordingView {
            panic_on_show: true,
            ..Default::default()
        };

        let task = {
            let controller = controller.clone();
            let mut view = view.clone();
            tokio::spawn(async move { controller.submit("01310930", &mut view).await })
        };

        let joined = task.await;
        assert!(joined.unwrap_err().is_panic());

        let state = view.state();
        assert_eq!(state.busy_entries, 1);
        assert_eq!(state.busy_exits, 1);
        assert!(!state.disabled);
        drop(state);
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn test_idle_restored_when_cancelled() {
        let gate = Arc::new(Notify::new());
        let mut lookup = FakeLookup::with_uf("SP", "São Paulo");
        lookup.gate = Some(gate);
        let controller = Arc::new(LookupController::new(lookup, ServicePolicy::default()));

        let view = RecordingView::default();
        let task = {
            let controller = controller.clone();
            let mut view = view.clone();
            tokio::spawn(async move { controller.submit("01310930", &mut view).await })
        };
        while view.state().busy_entries == 0 {
            tokio::task::yield_now().await;
        }

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert_idle(&view);
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn test_policy_matching() {
        let policy = ServicePolicy::default();
        assert!(policy.serves(Some("SP")));
        assert!(!policy.serves(Some(" SP")));
        assert!(!policy.serves(Some("sp")));
        assert!(!policy.serves(Some("RJ")));
        assert!(!policy.serves(None));
    }

    #[test]
    fn test_classify_without_uf_is_not_served() {
        let response = ViaCepResponse::default();
        let (outcome, payload) = classify(&response, &ServicePolicy::default());
        assert_eq!(outcome, SubmitOutcome::NotServed);
        assert!(payload.message.contains("Sua região: N/A/N/A."));
    }
}
