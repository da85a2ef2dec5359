//! Walks one session through the storefront: a catalog product and a custom build go into
//! the cart, then a bank-transfer deposit checkout runs to completion.

use pc_storefront::checkout::CheckoutState;
use pc_storefront::clients::CatalogSource;
use pc_storefront::config::StorefrontConfig;
use pc_storefront::configurator::format_vnd;
use pc_storefront::lifecycle::{setup_tracing, Storefront};
use pc_storefront::model::{
    CheckoutDraft, ComponentSlot, CustomerInfo, PaymentMethod, ProductCreate, ProductId,
    TransferOption,
};
use tracing::{error, info, Instrument};

fn seed_products() -> Vec<ProductCreate> {
    vec![
        ProductCreate::new("CPU001", "Intel Core i7-13700K", "CPU", 15_990_000, 12)
            .brand("Intel")
            .tag("gaming")
            .original_price(17_490_000),
        ProductCreate::new("CPU002", "AMD Ryzen 5 7600", "CPU", 4_500_000, 20).brand("AMD"),
        ProductCreate::new("MB001", "MSI B650M Gaming", "Motherboard", 3_200_000, 8).brand("MSI"),
        ProductCreate::new("RAM001", "Kingston Fury 16GB DDR5", "RAM", 1_400_000, 30),
        ProductCreate::new("GPU001", "RTX 4060 8GB", "GPU", 4_000_000, 6).tag("gaming"),
        ProductCreate::new("SSD001", "Samsung 980 1TB", "SSD", 1_200_000, 25),
        ProductCreate::new("PSU001", "Corsair CV650", "PSU", 1_000_000, 10),
        ProductCreate::new("CASE001", "NZXT H5 Flow", "Case", 600_000, 7),
    ]
}

fn build_choice() -> [(ComponentSlot, &'static str); 7] {
    [
        (ComponentSlot::Cpu, "AMD Ryzen 5 7600"),
        (ComponentSlot::Motherboard, "MSI B650M Gaming"),
        (ComponentSlot::Ram, "Kingston Fury 16GB DDR5"),
        (ComponentSlot::Gpu, "RTX 4060 8GB"),
        (ComponentSlot::Ssd, "Samsung 980 1TB"),
        (ComponentSlot::Psu, "Corsair CV650"),
        (ComponentSlot::Case, "NZXT H5 Flow"),
    ]
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = StorefrontConfig::load().map_err(|e| e.to_string())?;
    info!(data_dir = %config.storage.data_dir.display(), "Starting storefront");

    let storefront = Storefront::start(config).await.map_err(|e| e.to_string())?;
    info!(
        bank = %storefront.config().payment.bank_name,
        deposit = %storefront.config().payment.deposit_percentage,
        "Payment settings loaded"
    );

    let span = tracing::info_span!("catalog_seeding");
    async {
        for product in seed_products() {
            storefront
                .catalog
                .create_product(product)
                .await
                .map_err(|e| e.to_string())?;
        }
        info!("Catalog seeded");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Scenario: a single catalog product
    let cpu = storefront
        .catalog
        .get_product(&ProductId::from("CPU001"))
        .await
        .map_err(|e| e.to_string())?
        .ok_or("CPU001 missing from catalog")?;
    storefront
        .cart
        .add_product(cpu, 1)
        .await
        .map_err(|e| e.to_string())?;

    // Scenario: a custom build from seven parts
    let span = tracing::info_span!("build_configuration");
    let build = async {
        let mut configurator = storefront.configurator().await.map_err(|e| e.to_string())?;
        for (slot, name) in build_choice() {
            configurator
                .select_component(slot, name)
                .map_err(|e| e.to_string())?;
        }
        info!(total = %format_vnd(configurator.total()), "Build complete");
        configurator.materialize().map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    storefront
        .cart
        .add_custom_build(build)
        .await
        .map_err(|e| e.to_string())?;

    let total = storefront
        .cart
        .total_price()
        .await
        .map_err(|e| e.to_string())?;
    info!(total = %format_vnd(total), "Cart ready for checkout");

    // Checkout with a 30% deposit by bank transfer
    let draft = CheckoutDraft {
        customer: CustomerInfo {
            full_name: "Nguyen Van A".to_string(),
            phone: "0912345678".to_string(),
            address: "12 Ly Thuong Kiet, Ha Noi".to_string(),
            email: "a.nguyen@example.com".to_string(),
            notes: Some("Call before delivery".to_string()),
        },
        payment_method: PaymentMethod::BankTransfer,
        transfer_option: TransferOption::Deposit,
    };

    let span = tracing::info_span!("checkout");
    let outcome = async {
        let state = storefront.checkout.submit(&draft).await?;
        if let CheckoutState::PaymentDetails { order, reference } = &state {
            info!(
                order_id = %order.id,
                amount = %format_vnd(reference.amount),
                memo = %reference.memo,
                qr_url = reference.qr_url.as_deref().unwrap_or("-"),
                "Awaiting transfer"
            );
        }
        storefront.checkout.confirm_payment().await
    }
    .instrument(span)
    .await;

    match outcome {
        Ok(state) => info!(state = state.name(), "Checkout finished"),
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    // Shutdown system gracefully
    storefront.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
