use tibber_svg::TibberClient;

#[tokio::main]
async fn main() {
    let token = std::env::var("TIBBER_TOKEN").expect("TIBBER_TOKEN is not set.");

    let info = TibberClient::new(token)
        .fetch_price_info()
        .await
        .expect("Querying prices failed.");

    println!(
        "Current price: {:.04} ({})",
        info.current.total, info.current.level
    );

    for (day, prices) in [("Today", &info.today), ("Tomorrow", &info.tomorrow)] {
        println!("{day}:");
        if prices.is_empty() {
            println!("  not published yet");
        }
        for point in prices {
            println!("  {}: {:.04}", point.starts_at, point.total);
        }
    }
}
