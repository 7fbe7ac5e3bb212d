//! HTTP server setup.

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};
use metrics_exporter_prometheus::PrometheusHandle;
use sling_core::LockManager;

use crate::{api, metrics};

/// Creates and binds the lock server.
///
/// Port `0` binds an ephemeral port; read the bound address back from the
/// returned `HttpServer` addresses when that matters.
pub fn lock_server(
    manager: LockManager,
    metrics_handle: Option<PrometheusHandle>,
    context_path: String,
    address: String,
    port: u16,
) -> Result<(Server, Vec<std::net::SocketAddr>), std::io::Error> {
    let server = HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(manager.clone()));
        if let Some(handle) = metrics_handle.clone() {
            app = app
                .app_data(web::Data::new(handle))
                .route("/metrics", web::get().to(metrics::render));
        }
        app.service(api::routes(&context_path))
    })
    .bind((address, port))?;

    let addrs = server.addrs();
    Ok((server.run(), addrs))
}
