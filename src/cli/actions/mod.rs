pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        session_secret: String,
        frontend_url: String,
    },
}
