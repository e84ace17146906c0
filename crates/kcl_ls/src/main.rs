use tower_lsp::{LspService, Server};

use kcl_ls::server::KclServer;

#[tokio::main]
async fn main() {
    env_logger::init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(KclServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
