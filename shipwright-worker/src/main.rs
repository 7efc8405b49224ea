use anyhow::Context;
use shipwright_core::OrderSource;
use shipwright_order::{CreateFulfillmentOrderMapper, ShippingService};
use shipwright_store::{app_config::Config, JsonFileSource, ReqwestHttpClient};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipwright_worker=debug,shipwright_order=debug,shipwright_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Shipping via {}", config.fulfillment.base_url);

    let source = JsonFileSource::new(config.source.data_dir.clone());
    let order = source
        .load_order(config.source.order_id)
        .await
        .with_context(|| format!("Failed to load order {}", config.source.order_id))?;
    let buyer = source
        .load_buyer(config.source.buyer_id)
        .await
        .with_context(|| format!("Failed to load buyer {}", config.source.buyer_id))?;

    let service = ShippingService::new(
        Arc::new(ReqwestHttpClient::from_config(&config.fulfillment)),
        Arc::new(CreateFulfillmentOrderMapper::new()),
        config.polling.to_shipping_config(),
    );

    // Ctrl-C stops the wait; the submitted order stays with the provider.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match service.ship_with_cancellation(&order, &buyer, &cancel).await {
        Ok(tracking_number) => {
            tracing::info!(order_id = order.id, "Tracking number: {}", tracking_number);
            println!("{}", tracking_number);
            Ok(())
        }
        Err(e) => {
            if e.order_created() {
                tracing::error!(
                    order_id = order.id,
                    "Fulfillment order was created upstream but no tracking number was obtained; reconcile before resubmitting"
                );
            }
            Err(e).context(format!("Failed to ship order {}", order.id))
        }
    }
}
