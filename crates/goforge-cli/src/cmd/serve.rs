use crate::cmd::load_config;
use anyhow::Result;
use goforge_server::ServeOptions;
use std::path::Path;

/// `goforge api`: JSON endpoints only.
pub fn run_api(root: &Path, port: Option<u16>) -> Result<()> {
    let config = load_config(root)?;
    let port = port.unwrap_or(config.server.api_port);
    start(
        root,
        port,
        ServeOptions {
            ui: false,
            open_browser: false,
        },
    )
}

/// `goforge web`: JSON endpoints plus the embedded front end.
pub fn run_web(root: &Path, port: Option<u16>, no_open: bool) -> Result<()> {
    let config = load_config(root)?;
    let port = port.unwrap_or(config.server.web_port);
    start(
        root,
        port,
        ServeOptions {
            ui: true,
            open_browser: !no_open,
        },
    )
}

fn start(root: &Path, port: u16, opts: ServeOptions) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        let kind = if opts.ui { "web UI" } else { "API" };
        println!("goforge {kind} → http://localhost:{actual_port}");

        tokio::select! {
            res = goforge_server::serve_on(root_buf, listener, opts) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
