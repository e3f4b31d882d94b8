use actix_files as fs;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicedesk::{
  adapters::http::{
    RequestIdMiddleware, TemplateEngine, WebRouteDependencies, configure_web_routes,
    login_resource,
  },
  application::auth::{
    AuthenticateUseCase, LogoutUserUseCase, RegisterUserCommand, RegisterUserUseCase,
  },
  application::invoice::{
    CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceFormUseCase, ListInvoicesUseCase,
    UpdateInvoiceUseCase,
  },
  domain::auth::services::AuthService,
  domain::invoice::{InvoiceService, ListingCache},
  infrastructure::{
    auth::CredentialsAuthProvider,
    cache::{InMemoryListingCache, RedisListingCache},
    config::{Config, RedisConfig},
    persistence::postgres::{
      PostgresCustomerRepository, PostgresInvoiceRepository, PostgresSessionRepository,
      PostgresUserRepository,
    },
    security::Argon2PasswordHasher,
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoicedesk=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoicedesk");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::other(format!("Configuration error: {}", e))
  })?;
  tracing::info!("Configuration loaded successfully");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;
  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  let listing_cache: Arc<dyn ListingCache> = match &config.redis {
    Some(redis_config) => match connect_redis(redis_config).await {
      Ok(conn) => {
        tracing::info!("Listing cache backed by Redis");
        Arc::new(RedisListingCache::new(conn, config.cache.ttl_seconds))
      }
      Err(e) => {
        tracing::warn!("Redis unavailable ({}), caching listings in memory", e);
        Arc::new(InMemoryListingCache::new(Duration::from_secs(
          config.cache.ttl_seconds,
        )))
      }
    },
    None => {
      tracing::info!("No Redis configured, caching listings in memory");
      Arc::new(InMemoryListingCache::new(Duration::from_secs(
        config.cache.ttl_seconds,
      )))
    }
  };

  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let session_repo = Arc::new(PostgresSessionRepository::new(db_pool.clone()));
  let customer_repo = Arc::new(PostgresCustomerRepository::new(db_pool.clone()));
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));

  let password_hasher = Arc::new(Argon2PasswordHasher::new().map_err(|e| {
    tracing::error!("Failed to create password hasher: {}", e);
    std::io::Error::other(e.to_string())
  })?);

  let auth_service = Arc::new(AuthService::new(
    user_repo.clone(),
    session_repo,
    config.security.auth_service_config(),
  ));
  let invoice_service = Arc::new(InvoiceService::new(
    invoice_repo,
    customer_repo,
    listing_cache.clone(),
  ));

  if let Some(bootstrap) = &config.bootstrap_user {
    let register_use_case = RegisterUserUseCase::new(user_repo.clone(), password_hasher);
    let user = register_use_case
      .execute(RegisterUserCommand {
        name: bootstrap.name.clone(),
        email: bootstrap.email.clone(),
        password: bootstrap.password.clone(),
      })
      .await
      .map_err(|e| {
        tracing::error!("Failed to provision bootstrap user: {}", e);
        std::io::Error::other(e.to_string())
      })?;
    tracing::info!("Bootstrap user {} is available", user.email);
  }

  let provider = Arc::new(CredentialsAuthProvider::new(
    user_repo,
    auth_service.clone(),
  ));
  let authenticate_use_case = Arc::new(AuthenticateUseCase::new(provider));
  let logout_use_case = Arc::new(LogoutUserUseCase::new(auth_service.clone()));

  let list_invoices_use_case = Arc::new(ListInvoicesUseCase::new(invoice_service.clone()));
  let invoice_form_use_case = Arc::new(GetInvoiceFormUseCase::new(invoice_service.clone()));
  let create_invoice_use_case = Arc::new(CreateInvoiceUseCase::new(invoice_service.clone()));
  let update_invoice_use_case = Arc::new(UpdateInvoiceUseCase::new(invoice_service.clone()));
  let delete_invoice_use_case = Arc::new(DeleteInvoiceUseCase::new(invoice_service));

  let login_governor = GovernorConfigBuilder::default()
    .per_second(config.rate_limit.login_replenish_seconds)
    .burst_size(config.rate_limit.login_burst)
    .finish()
    .ok_or_else(|| {
      std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        "Rate limit period and burst must be greater than zero",
      )
    })?;

  let templates = TemplateEngine::new().map_err(|e| {
    tracing::error!("Failed to initialize template engine: {}", e);
    std::io::Error::other(format!("Template error: {}", e))
  })?;
  tracing::info!("Template engine initialized");

  let deps = WebRouteDependencies {
    templates,
    auth_service,
    listing_cache,
    logout_use_case,
    list_invoices_use_case,
    invoice_form_use_case,
    create_invoice_use_case,
    update_invoice_use_case,
    delete_invoice_use_case,
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let deps = deps.clone();
    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware)
      .service(login_resource(authenticate_use_case.clone()).wrap(Governor::new(&login_governor)))
      .configure(|cfg| configure_web_routes(cfg, deps))
      .service(fs::Files::new("/static", "./static"))
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

async fn connect_redis(
  redis_config: &RedisConfig,
) -> Result<redis::aio::ConnectionManager, String> {
  let client = redis::Client::open(redis_config.url.clone())
    .map_err(|e| format!("invalid Redis URL: {}", e))?;

  tokio::time::timeout(
    Duration::from_secs(redis_config.connect_timeout_seconds),
    client.get_connection_manager(),
  )
  .await
  .map_err(|_| {
    format!(
      "connection timed out after {} seconds",
      redis_config.connect_timeout_seconds
    )
  })?
  .map_err(|e| e.to_string())
}

async fn health_check() -> &'static str {
  "OK"
}
