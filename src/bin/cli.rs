//! BookWise CLI
//!
//! Command-line client for a running BookWise API:
//! - Browse books, deals and recommendations
//! - Manage the wishlist
//! - Track the monthly budget
//! - Inspect preferences and server status

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use bookwise::store::validate;

#[derive(Parser)]
#[command(name = "bookwise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Book discovery and reading budget tracker")]
#[command(long_about = "BookWise helps you find books you can afford.\nBrowse deals, keep a wishlist with target prices, and track what you spend each month.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List or search books
    Books {
        /// Search title, author and genres
        #[arg(short, long)]
        query: Option<String>,
        /// Genre filter
        #[arg(short, long)]
        genre: Option<String>,
        /// Minimum price
        #[arg(long)]
        min: Option<f64>,
        /// Maximum price
        #[arg(long)]
        max: Option<f64>,
    },

    /// Show one book with retailer prices
    Book {
        /// Book ID
        id: String,
    },

    /// List discounted books
    Deals,

    /// Get recommendations (stored preferences when no genre or price is given)
    Recommend {
        /// Favorite genres
        #[arg(short, long)]
        genre: Vec<String>,
        /// Price ceiling
        #[arg(long)]
        max: Option<f64>,
    },

    /// Show the wishlist
    Wishlist {
        /// Only items whose target price has been reached
        #[arg(long)]
        alerts: bool,
    },

    /// Add a book to the wishlist, or remove it if already there
    Toggle {
        /// Book ID
        book_id: String,
        /// Target price
        #[arg(short, long)]
        target: Option<f64>,
    },

    /// Show a month's budget (default: current month)
    Budget {
        /// Month as YYYY-MM
        month: Option<String>,
    },

    /// Record a purchase
    Purchase {
        /// Book title
        title: String,
        /// Amount paid
        amount: String,
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Retailer
        #[arg(short, long)]
        retailer: Option<String>,
    },

    /// Set a month's budget amount
    SetBudget {
        /// Budget amount
        amount: String,
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show preferences
    Prefs,

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Thin JSON client over the REST API
struct Api {
    client: reqwest::Client,
    base: String,
}

impl Api {
    fn new(base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> anyhow::Result<Value> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("Cannot connect to BookWise API at {}", self.base))?;
        read_json(response).await
    }

    async fn get_query(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("Cannot connect to BookWise API at {}", self.base))?;
        read_json(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Cannot connect to BookWise API at {}", self.base))?;
        read_json(response).await
    }

    async fn put(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Cannot connect to BookWise API at {}", self.base))?;
        read_json(response).await
    }

    /// Resolve an optional month argument, defaulting to the server's current month
    async fn month_or_current(&self, month: Option<String>) -> anyhow::Result<String> {
        match month {
            Some(m) => {
                let key: bookwise::MonthKey = m.parse()?;
                Ok(key.to_string())
            }
            None => {
                let current = self.get("/api/v1/budgets/current").await?;
                current["month"]
                    .as_str()
                    .map(str::to_string)
                    .context("Server returned a budget without a month")
            }
        }
    }
}

async fn read_json(response: reqwest::Response) -> anyhow::Result<Value> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.context("Invalid JSON from server");
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    match body["error"]["message"].as_str() {
        Some(message) => bail!("{} ({})", message, status),
        None => bail!("Request failed ({})", status),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let api = Api::new(&cli.api_url);
    let json = cli.format == "json";

    match cli.command {
        Commands::Books {
            query,
            genre,
            min,
            max,
        } => {
            let mut params = Vec::new();
            if let Some(q) = query {
                params.push(("q", q));
            }
            if let Some(g) = genre {
                params.push(("genre", g));
            }
            if let Some(min) = min {
                params.push(("min", min.to_string()));
            }
            if let Some(max) = max {
                params.push(("max", max.to_string()));
            }

            let data = api.get_query("/api/v1/books", &params).await?;
            output(json, &data, |d| print_books(&d["books"]))?;
        }

        Commands::Book { id } => {
            let data = api.get(&format!("/api/v1/books/{}", id)).await?;
            output(json, &data, print_book_detail)?;
        }

        Commands::Deals => {
            let data = api.get("/api/v1/books/deals").await?;
            output(json, &data, |d| print_books(&d["books"]))?;
        }

        Commands::Recommend { genre, max } => {
            let data = if genre.is_empty() && max.is_none() {
                api.get("/api/v1/recommendations").await?
            } else {
                let price_range = max.map(|max| serde_json::json!({"min": 0.0, "max": max}));
                let body = serde_json::json!({
                    "favoriteGenres": genre,
                    "priceRange": price_range,
                });
                api.post("/api/v1/recommendations", &body).await?
            };
            output(json, &data, |d| print_books(&d["books"]))?;
        }

        Commands::Wishlist { alerts } => {
            if alerts {
                let data = api.get("/api/v1/wishlist/alerts").await?;
                output(json, &data, print_alerts)?;
            } else {
                let data = api.get("/api/v1/wishlist").await?;
                output(json, &data, print_wishlist)?;
            }
        }

        Commands::Toggle { book_id, target } => {
            let body = serde_json::json!({"bookId": book_id, "targetPrice": target});
            let data = api.post("/api/v1/wishlist/toggle", &body).await?;
            output(json, &data, |d| {
                let action = d["action"].as_str().unwrap_or("toggled");
                println!("Book {} {} wishlist", book_id, if action == "added" { "added to" } else { "removed from" });
            })?;
        }

        Commands::Budget { month } => {
            let month = api.month_or_current(month).await?;
            // Only the current month is opened on demand; an unknown explicit month is a 404
            let data = api.get(&format!("/api/v1/budgets/{}/summary", month)).await?;
            output(json, &data, print_summary)?;
        }

        Commands::Purchase {
            title,
            amount,
            month,
            retailer,
        } => {
            let amount = validate::purchase_amount(validate::parse_amount(&amount)?)?;
            let month = api.month_or_current(month).await?;
            let body = serde_json::json!({
                "bookTitle": title,
                "amount": amount,
                "retailer": retailer,
            });
            let data = api
                .post(&format!("/api/v1/budgets/{}/purchases", month), &body)
                .await?;
            output(json, &data, |d| {
                println!(
                    "Recorded {} for {:?} in {}",
                    amount,
                    title,
                    d["month"].as_str().unwrap_or("-")
                );
                println!(
                    "Spent {} of {}",
                    d["spentAmount"].as_f64().unwrap_or(0.0),
                    d["budgetAmount"].as_f64().unwrap_or(0.0)
                );
            })?;
        }

        Commands::SetBudget { amount, month } => {
            let amount = validate::budget_amount(validate::parse_amount(&amount)?)?;
            let month = match month {
                Some(m) => m.parse::<bookwise::MonthKey>()?,
                None => bookwise::MonthKey::current(),
            };
            let body = serde_json::json!({"amount": amount});
            let data = api.put(&format!("/api/v1/budgets/{}", month), &body).await?;
            output(json, &data, |d| {
                println!("Budget for {} set to {}", month, d["budgetAmount"].as_f64().unwrap_or(amount));
            })?;
        }

        Commands::Prefs => {
            let data = api.get("/api/v1/preferences").await?;
            output(json, &data, print_prefs)?;
        }

        Commands::Status => {
            let health = match api.get("/health").await {
                Ok(health) => health,
                Err(e) => {
                    eprintln!("{:#}", e);
                    eprintln!();
                    eprintln!("Make sure the BookWise API server is running:");
                    eprintln!("  cargo run --bin bookwise-api");
                    std::process::exit(1);
                }
            };

            println!("BookWise v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));

            let stats = &health["store_stats"];
            println!();
            println!("Store:");
            println!("  Books: {}", stats["bookCount"].as_u64().unwrap_or(0));
            println!("  Deals: {}", stats["dealCount"].as_u64().unwrap_or(0));
            println!("  Wishlist items: {}", stats["wishlistCount"].as_u64().unwrap_or(0));
            println!("  Budget months: {}", stats["budgetMonths"].as_u64().unwrap_or(0));

            if let Some(uptime) = health["uptime_seconds"].as_u64() {
                println!();
                println!("Uptime: {}", format_duration(uptime));
            }
        }

        Commands::Config { output } => {
            let config = bookwise::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("Cannot create {:?}", parent))?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("Cannot write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn output(json: bool, data: &Value, table: impl FnOnce(&Value)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        table(data);
    }
    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn price(value: &Value) -> String {
    value
        .as_f64()
        .map(|p| format!("₹{}", p))
        .unwrap_or_else(|| "-".to_string())
}

fn print_books(books: &Value) {
    let books = match books.as_array() {
        Some(b) if !b.is_empty() => b,
        _ => {
            println!("No books found");
            return;
        }
    };

    println!(
        "{:<4} {:<34} {:<22} {:>8} {:>8} {:<10} {:>6}",
        "ID", "Title", "Author", "Price", "Was", "Format", "Rating"
    );
    println!("{}", "-".repeat(98));

    for book in books {
        println!(
            "{:<4} {:<34} {:<22} {:>8} {:>8} {:<10} {:>6}",
            book["id"].as_str().unwrap_or("-"),
            truncate(book["title"].as_str().unwrap_or("-"), 34),
            truncate(book["author"].as_str().unwrap_or("-"), 22),
            price(&book["currentPrice"]),
            price(&book["originalPrice"]),
            book["format"].as_str().unwrap_or("-"),
            book["rating"].as_f64().map(|r| format!("{:.1}", r)).unwrap_or_default()
        );
    }
}

fn print_book_detail(detail: &Value) {
    let book = &detail["book"];
    println!("{}", book["title"].as_str().unwrap_or("-"));
    println!("by {}", book["author"].as_str().unwrap_or("-"));
    println!();
    println!("Price: {}", price(&book["currentPrice"]));
    if let Some(discount) = detail["discountPercentage"].as_u64().filter(|d| *d > 0) {
        println!("Was:   {} ({}% off)", price(&book["originalPrice"]), discount);
    }
    println!("Format: {}", book["format"].as_str().unwrap_or("-"));
    if let Some(genres) = book["genres"].as_array() {
        let names: Vec<&str> = genres.iter().filter_map(Value::as_str).collect();
        println!("Genres: {}", names.join(", "));
    }
    println!(
        "In wishlist: {}",
        if detail["inWishlist"].as_bool().unwrap_or(false) { "yes" } else { "no" }
    );

    if let Some(retailers) = book["retailerPrices"].as_object() {
        if !retailers.is_empty() {
            println!();
            println!("Retailers:");
            let best = detail["bestOffer"]["retailer"].as_str();
            for (name, value) in retailers {
                let marker = if Some(name.as_str()) == best { "  (best)" } else { "" };
                println!("  {:<12} {:>8}{}", name, price(value), marker);
            }
        }
    }

    if let Some(synopsis) = book["synopsis"].as_str().filter(|s| !s.is_empty()) {
        println!();
        println!("{}", synopsis);
    }
}

fn print_wishlist(data: &Value) {
    let items = match data["items"].as_array() {
        Some(i) if !i.is_empty() => i,
        _ => {
            println!("Your wishlist is empty.");
            println!();
            println!("Save a book with:");
            println!("  bookwise toggle <book-id>");
            return;
        }
    };

    println!("{:<4} {:<34} {:>8} {:>8}  {}", "#", "Title", "Price", "Target", "Status");
    println!("{}", "-".repeat(80));

    for entry in items {
        let item = &entry["item"];
        let status = match entry["priceStatus"]["status"].as_str() {
            Some("target-met") => "Target price reached!".to_string(),
            Some("above-target") => format!(
                "₹{} above target ({}%)",
                entry["priceStatus"]["difference"].as_f64().unwrap_or(0.0),
                entry["priceStatus"]["percentage"].as_u64().unwrap_or(0)
            ),
            _ => String::new(),
        };
        println!(
            "{:<4} {:<34} {:>8} {:>8}  {}",
            item["priority"].as_u64().unwrap_or(0),
            truncate(entry["book"]["title"].as_str().unwrap_or("(removed book)"), 34),
            price(&entry["book"]["currentPrice"]),
            price(&item["targetPrice"]),
            status
        );
    }
}

fn print_alerts(data: &Value) {
    let alerts = match data.as_array() {
        Some(a) if !a.is_empty() => a,
        _ => {
            println!("No price alerts");
            return;
        }
    };

    for alert in alerts {
        println!(
            "{} is now {} (target {})",
            alert["book"]["title"].as_str().unwrap_or("-"),
            price(&alert["currentPrice"]),
            price(&alert["targetPrice"])
        );
    }
}

fn print_summary(summary: &Value) {
    let spent = summary["spentAmount"].as_f64().unwrap_or(0.0);
    let budget = summary["budgetAmount"].as_f64().unwrap_or(0.0);
    let percent = summary["percentSpent"].as_f64().unwrap_or(0.0);

    println!("Budget for {}", summary["month"].as_str().unwrap_or("-"));
    println!();
    println!("  Budget:    ₹{}", budget);
    println!("  Spent:     ₹{} ({:.0}%)", spent, percent);
    println!("  Remaining: {}", price(&summary["remaining"]));
    println!("  Purchases: {}", summary["purchaseCount"].as_u64().unwrap_or(0));
    println!(
        "  Enough for about {} more books",
        summary["booksAffordable"].as_u64().unwrap_or(0)
    );

    let filled = ((percent.min(100.0) / 5.0).round() as usize).min(20);
    println!();
    println!("  [{}{}]", "#".repeat(filled), ".".repeat(20 - filled));
}

fn print_prefs(prefs: &Value) {
    let list = |v: &Value| -> String {
        v.as_array()
            .map(|a| a.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "))
            .unwrap_or_default()
    };

    println!(
        "Onboarded:       {}",
        if prefs["isOnboarded"].as_bool().unwrap_or(false) { "yes" } else { "no" }
    );
    println!("Favorite genres: {}", list(&prefs["favoriteGenres"]));
    println!("Formats:         {}", list(&prefs["preferredFormats"]));
    println!("Monthly budget:  {}", price(&prefs["monthlyBudget"]));
    println!(
        "Price range:     {} - {}",
        price(&prefs["priceRange"]["min"]),
        price(&prefs["priceRange"]["max"])
    );

    if let Some(flags) = prefs["notificationPreferences"].as_object() {
        println!("Notifications:");
        for (name, enabled) in flags {
            println!("  {:<14} {}", name, if enabled.as_bool().unwrap_or(false) { "on" } else { "off" });
        }
    }
}
