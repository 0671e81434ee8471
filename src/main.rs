#[tokio::main]
async fn main() {
    if let Err(e) = upa_agenda_lib::run().await {
        eprintln!("upa-agenda: {e}");
        std::process::exit(1);
    }
}
