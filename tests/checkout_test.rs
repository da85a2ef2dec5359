use async_trait::async_trait;
use chrono::Utc;
use pc_storefront::backend::{OrderBackend, SubmissionError};
use pc_storefront::cart_actor::{self, CartStorage};
use pc_storefront::checkout::{
    CheckoutError, CheckoutField, CheckoutOrchestrator, CheckoutState, OrderSubmissionAdapter,
};
use pc_storefront::clients::{CartClient, CatalogSource};
use pc_storefront::config::{PaymentConfig, StorefrontConfig};
use pc_storefront::configurator::DisabledAdvisor;
use pc_storefront::lifecycle::Storefront;
use pc_storefront::model::{
    CatalogProduct, CheckoutDraft, ComponentSlot, CustomerInfo, OrderDraft, OrderId,
    OrderItemKind, PaymentMethod, PaymentStatus, ProductCreate, ProductId, SubmittedOrder,
    TransferOption,
};
use pc_storefront::storage::MemoryStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

// --- Backends standing in for the order service ---

/// Accepts every order and remembers the drafts it saw.
#[derive(Default)]
struct RecordingBackend {
    drafts: Mutex<Vec<OrderDraft>>,
}

#[async_trait]
impl OrderBackend for RecordingBackend {
    async fn create_order(&self, draft: OrderDraft) -> Result<SubmittedOrder, SubmissionError> {
        let mut drafts = self.drafts.lock().unwrap();
        drafts.push(draft.clone());
        let id = OrderId::from_seq(drafts.len() as u32);
        Ok(SubmittedOrder::from_draft(id, draft, Utc::now()))
    }
}

/// Fails every order.
#[derive(Default)]
struct FailingBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl OrderBackend for FailingBackend {
    async fn create_order(&self, _draft: OrderDraft) -> Result<SubmittedOrder, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SubmissionError::Unavailable("connection refused".to_string()))
    }
}

/// Holds each submission until the test releases it.
#[derive(Default)]
struct GatedBackend {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl OrderBackend for GatedBackend {
    async fn create_order(&self, draft: OrderDraft) -> Result<SubmittedOrder, SubmissionError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(SubmittedOrder::from_draft(OrderId::from_seq(1), draft, Utc::now()))
    }
}

// --- Helpers ---

fn cpu() -> CatalogProduct {
    CatalogProduct::new("CPU001", "Intel Core i7-13700K", 15_990_000, 12)
}

fn gpu() -> CatalogProduct {
    CatalogProduct::new("GPU001", "RTX 4060 8GB", 4_000_000, 6)
}

fn customer() -> CustomerInfo {
    CustomerInfo {
        full_name: "Tran Thi B".to_string(),
        phone: "0987654321".to_string(),
        address: "45 Nguyen Hue, Quan 1".to_string(),
        email: "b.tran@example.com".to_string(),
        notes: None,
    }
}

fn draft(method: PaymentMethod, option: TransferOption) -> CheckoutDraft {
    CheckoutDraft {
        customer: customer(),
        payment_method: method,
        transfer_option: option,
    }
}

async fn checkout_with(
    backend: Arc<dyn OrderBackend>,
) -> (CheckoutOrchestrator, CartClient, JoinHandle<()>) {
    let (actor, client) = cart_actor::new();
    let handle = tokio::spawn(actor.run(CartStorage::new(Arc::new(MemoryStore::new()), "cart")));
    let cart = CartClient::open(client).await.unwrap();
    let checkout = CheckoutOrchestrator::new(
        cart.clone(),
        OrderSubmissionAdapter::new(backend),
        PaymentConfig::default(),
    );
    (checkout, cart, handle)
}

async fn close(checkout: CheckoutOrchestrator, cart: CartClient, handle: JoinHandle<()>) {
    drop(checkout);
    drop(cart);
    handle.await.unwrap();
}

// --- Tests ---

#[tokio::test]
async fn test_cod_order_succeeds_and_empties_cart() {
    let backend = Arc::new(RecordingBackend::default());
    let (checkout, cart, handle) = checkout_with(backend.clone()).await;
    cart.add_product(cpu(), 1).await.unwrap();

    let state = checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await
        .unwrap();

    let CheckoutState::Success { order } = state else {
        panic!("Expected Success");
    };
    assert_eq!(order.total_amount, 15_990_000);
    assert_eq!(order.payment_details.amount_to_pay, 15_990_000);
    assert_eq!(order.payment_details.status, PaymentStatus::Pending);
    assert_eq!(order.payment_details.transfer_option, None);
    assert!(cart.snapshot().await.unwrap().is_empty());
    assert_eq!(backend.drafts.lock().unwrap().len(), 1);

    close(checkout, cart, handle).await;
}

#[tokio::test]
async fn test_bank_transfer_keeps_cart_until_confirmed() {
    let (checkout, cart, handle) = checkout_with(Arc::new(RecordingBackend::default())).await;
    cart.add_product(cpu(), 1).await.unwrap();

    let state = checkout
        .submit(&draft(PaymentMethod::BankTransfer, TransferOption::Full))
        .await
        .unwrap();

    let CheckoutState::PaymentDetails { order, reference } = &state else {
        panic!("Expected PaymentDetails, got {state:?}");
    };
    assert_eq!(order.payment_details.status, PaymentStatus::AwaitingTransfer);
    assert_eq!(reference.amount, 15_990_000);
    assert_eq!(reference.memo, format!("TT DON HANG {}", order.id));
    assert_eq!(cart.item_count().await.unwrap(), 1);

    let confirmed = checkout.confirm_payment().await.unwrap();
    assert_eq!(confirmed.name(), "Success");
    assert_eq!(confirmed.order(), state.order());
    assert!(cart.snapshot().await.unwrap().is_empty());

    close(checkout, cart, handle).await;
}

#[tokio::test]
async fn test_deposit_charges_thirty_percent() {
    let backend = Arc::new(RecordingBackend::default());
    let (checkout, cart, handle) = checkout_with(backend.clone()).await;
    cart.add_product(gpu(), 5).await.unwrap();

    let state = checkout
        .submit(&draft(PaymentMethod::BankTransfer, TransferOption::Deposit))
        .await
        .unwrap();

    let CheckoutState::PaymentDetails { order, reference } = state else {
        panic!("Expected PaymentDetails");
    };
    assert_eq!(order.total_amount, 20_000_000);
    assert_eq!(order.payment_details.amount_to_pay, 6_000_000);
    assert_eq!(order.payment_details.transfer_option, Some(TransferOption::Deposit));
    assert_eq!(reference.amount, 6_000_000);
    let qr = reference.qr_url.expect("default template renders");
    assert!(qr.contains("amount=6000000"));

    let sent = backend.drafts.lock().unwrap();
    assert_eq!(sent[0].payment_details.amount_to_pay, 6_000_000);
    drop(sent);

    close(checkout, cart, handle).await;
}

#[tokio::test]
async fn test_invalid_form_submits_nothing() {
    let backend = Arc::new(RecordingBackend::default());
    let (checkout, cart, handle) = checkout_with(backend.clone()).await;
    cart.add_product(cpu(), 1).await.unwrap();

    let mut bad = draft(PaymentMethod::Cod, TransferOption::Full);
    bad.customer.phone = "12345".to_string();
    bad.customer.email = "not-an-email".to_string();
    bad.customer.full_name = "   ".to_string();

    let Err(CheckoutError::Validation(errors)) = checkout.submit(&bad).await else {
        panic!("Expected validation errors");
    };
    let fields: Vec<CheckoutField> = errors.fields().collect();
    assert_eq!(
        fields,
        vec![CheckoutField::FullName, CheckoutField::Phone, CheckoutField::Email]
    );
    assert!(backend.drafts.lock().unwrap().is_empty());
    assert_eq!(checkout.state(), CheckoutState::Form);
    assert_eq!(cart.item_count().await.unwrap(), 1);

    close(checkout, cart, handle).await;
}

#[tokio::test]
async fn test_empty_cart_cannot_check_out() {
    let backend = Arc::new(RecordingBackend::default());
    let (checkout, cart, handle) = checkout_with(backend.clone()).await;

    let result = checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await;

    assert_eq!(result, Err(CheckoutError::EmptyCart));
    assert!(backend.drafts.lock().unwrap().is_empty());

    close(checkout, cart, handle).await;
}

#[tokio::test]
async fn test_failed_submission_keeps_cart_and_form() {
    let backend = Arc::new(FailingBackend::default());
    let (checkout, cart, handle) = checkout_with(backend.clone()).await;
    cart.add_product(cpu(), 2).await.unwrap();

    let result = checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await;

    match result {
        Err(CheckoutError::Submission(e)) => assert!(e.is_retryable()),
        other => panic!("Expected submission failure, got {other:?}"),
    }
    assert_eq!(checkout.state(), CheckoutState::Form);
    assert!(!checkout.is_submitting());
    assert_eq!(cart.item_count().await.unwrap(), 2);

    // The buyer may try again
    let retry = checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await;
    assert!(matches!(retry, Err(CheckoutError::Submission(_))));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);

    close(checkout, cart, handle).await;
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_refused() {
    let backend = Arc::new(GatedBackend::default());
    let (checkout, cart, handle) = checkout_with(backend.clone()).await;
    cart.add_product(cpu(), 1).await.unwrap();
    let checkout = Arc::new(checkout);

    let first = tokio::spawn({
        let checkout = checkout.clone();
        async move {
            checkout
                .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
                .await
        }
    });

    backend.entered.notified().await;
    assert!(checkout.is_submitting());
    let second = checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await;
    assert_eq!(second, Err(CheckoutError::SubmissionInFlight));

    backend.release.notify_one();
    let state = first.await.unwrap().unwrap();
    assert_eq!(state.name(), "Success");
    assert!(!checkout.is_submitting());

    drop(checkout);
    drop(cart);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_state_guards() {
    let (checkout, cart, handle) = checkout_with(Arc::new(RecordingBackend::default())).await;

    assert_eq!(
        checkout.confirm_payment().await,
        Err(CheckoutError::InvalidState {
            action: "confirm payment",
            state: "Form"
        })
    );

    cart.add_product(cpu(), 1).await.unwrap();
    checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await
        .unwrap();

    // Already past the form
    let again = checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await;
    assert!(matches!(again, Err(CheckoutError::InvalidState { .. })));

    // Restart needs something in the cart
    assert_eq!(checkout.restart().await, Err(CheckoutError::EmptyCart));
    cart.add_product(gpu(), 1).await.unwrap();
    assert_eq!(checkout.restart().await.unwrap(), CheckoutState::Form);

    close(checkout, cart, handle).await;
}

// --- Whole storefront ---

async fn storefront() -> Storefront {
    Storefront::start_with(
        StorefrontConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(DisabledAdvisor),
    )
    .await
    .unwrap()
}

async fn seed(storefront: &Storefront) {
    let products = [
        ProductCreate::new("CPU001", "Intel Core i7-13700K", "CPU", 15_990_000, 12),
        ProductCreate::new("CPU002", "AMD Ryzen 5 7600", "CPU", 4_500_000, 20),
        ProductCreate::new("MB001", "MSI B650M Gaming", "Motherboard", 3_200_000, 8),
        ProductCreate::new("RAM001", "Kingston Fury 16GB DDR5", "RAM", 1_400_000, 30),
        ProductCreate::new("GPU001", "RTX 4060 8GB", "GPU", 4_000_000, 6),
        ProductCreate::new("SSD001", "Samsung 980 1TB", "SSD", 1_200_000, 25),
        ProductCreate::new("PSU001", "Corsair CV650", "PSU", 1_000_000, 10),
        ProductCreate::new("CASE001", "NZXT H5 Flow", "Case", 600_000, 7),
    ];
    for product in products {
        storefront.catalog.create_product(product).await.unwrap();
    }
}

#[tokio::test]
async fn test_single_product_checkout_end_to_end() {
    let storefront = storefront().await;
    seed(&storefront).await;

    let cpu = storefront
        .catalog
        .get_product(&ProductId::from("CPU001"))
        .await
        .unwrap()
        .unwrap();
    storefront.cart.add_product(cpu, 1).await.unwrap();
    assert_eq!(storefront.cart.total_price().await.unwrap(), 15_990_000);

    let state = storefront
        .checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await
        .unwrap();
    let order = state.order().unwrap().clone();
    assert_eq!(order.id, OrderId::from_seq(1));
    assert_eq!(order.items[0].kind, OrderItemKind::Product);

    // The in-process order actor kept it
    let orders = storefront.orders.as_ref().unwrap();
    assert_eq!(orders.find(order.id.clone()).await.unwrap(), Some(order));
    assert!(storefront.cart.snapshot().await.unwrap().is_empty());

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_custom_build_checkout_end_to_end() {
    let storefront = storefront().await;
    seed(&storefront).await;

    let mut configurator = storefront.configurator().await.unwrap();
    for (slot, name) in [
        (ComponentSlot::Cpu, "AMD Ryzen 5 7600"),
        (ComponentSlot::Motherboard, "MSI B650M Gaming"),
        (ComponentSlot::Ram, "Kingston Fury 16GB DDR5"),
        (ComponentSlot::Gpu, "RTX 4060 8GB"),
        (ComponentSlot::Ssd, "Samsung 980 1TB"),
        (ComponentSlot::Psu, "Corsair CV650"),
        (ComponentSlot::Case, "NZXT H5 Flow"),
    ] {
        configurator.select_component(slot, name).unwrap();
    }
    let build = configurator.materialize().unwrap();
    assert_eq!(build.price, 15_900_000);

    storefront.cart.add_custom_build(build.clone()).await.unwrap();
    assert_eq!(storefront.cart.total_price().await.unwrap(), 15_900_000);

    let state = storefront
        .checkout
        .submit(&draft(PaymentMethod::BankTransfer, TransferOption::Deposit))
        .await
        .unwrap();
    let CheckoutState::PaymentDetails { order, reference } = state else {
        panic!("Expected PaymentDetails");
    };
    assert_eq!(order.items[0].kind, OrderItemKind::CustomBuild);
    assert_eq!(order.items[0].components.as_ref(), Some(&build.build_components));
    assert_eq!(reference.amount, 4_770_000);

    storefront.checkout.confirm_payment().await.unwrap();
    assert!(storefront.cart.snapshot().await.unwrap().is_empty());

    storefront.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_orders_carry_the_signed_in_user() {
    let backend = Arc::new(RecordingBackend::default());
    let (checkout, cart, handle) = checkout_with(backend.clone()).await;
    let checkout = checkout.with_user("user_42");
    cart.add_product(gpu(), 1).await.unwrap();

    let state = checkout
        .submit(&draft(PaymentMethod::Cod, TransferOption::Full))
        .await
        .unwrap();

    assert_eq!(state.order().unwrap().user_id.as_deref(), Some("user_42"));
    assert_eq!(
        backend.drafts.lock().unwrap()[0].user_id.as_deref(),
        Some("user_42")
    );

    close(checkout, cart, handle).await;
}
