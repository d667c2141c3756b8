// src/bin/upload.rs
use dotenv::dotenv;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colors for the terminal ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

// Extensions the server accepts; anything else is skipped locally.
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

// --- Data structures ---

#[derive(Deserialize, Debug)]
struct UploadedPhoto {
    name: String,
}

#[derive(Debug)]
struct UploadResult {
    file_name: String,
    success: bool,
    detail: String,
    duration_secs: f64,
}

// --- Manager logic ---

struct PhotoUploadManager {
    base_url: String,
    event: String,
    client: Client,
    results: Vec<UploadResult>,
}

impl PhotoUploadManager {
    fn new(base_url: String, event: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            event,
            client,
            results: Vec::new(),
        }
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn upload_photo(&self, path: &PathBuf, file_name: &str) -> Result<UploadedPhoto, String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Could not read file: {}", e))?;

        let form = Form::new()
            .text("event", self.event.clone())
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            response
                .json::<UploadedPhoto>()
                .await
                .map_err(|e| format!("Failed to parse response JSON: {}", e))
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            Err(format!("HTTP {} - {}", status, body))
        }
    }

    async fn run_batch_upload(&mut self, directory: &str) {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            println!("{}❌ Service unavailable.{}", RED, RESET);
            println!("{}Please ensure photodesk is running (cargo run){}", YELLOW, RESET);
            process::exit(1);
        }
        println!("{}✅ Service available{}\n", GREEN, RESET);

        let files = match collect_image_files(directory) {
            Ok(files) => files,
            Err(err) => {
                println!("{}❌ Could not read directory {}: {}{}", RED, directory, err, RESET);
                process::exit(1);
            }
        };

        if files.is_empty() {
            println!(
                "{}⚠️  No files with extensions {:?} found in {}.{}",
                YELLOW, ALLOWED_EXTENSIONS, directory, RESET
            );
            return;
        }

        self.print_header(directory, files.len());

        println!("\n{}🚀 Starting upload...{}\n", BOLD, RESET);

        let total_files = files.len();

        for (i, path) in files.iter().enumerate() {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            let start_time = Instant::now();

            println!(
                "{}[{}/{}] Uploading {}...{}",
                CYAN,
                i + 1,
                total_files,
                file_name,
                RESET
            );

            let response = self.upload_photo(path, &file_name).await;
            let duration = start_time.elapsed().as_secs_f64();

            match response {
                Ok(photo) => {
                    println!(
                        "{}✅ {} stored as {} ({:.1}s){}",
                        GREEN, file_name, photo.name, duration, RESET
                    );
                    self.results.push(UploadResult {
                        file_name,
                        success: true,
                        detail: photo.name,
                        duration_secs: duration,
                    });
                }
                Err(err_msg) => {
                    println!("{}❌ Error uploading {}: {}{}", RED, file_name, err_msg, RESET);
                    self.results.push(UploadResult {
                        file_name,
                        success: false,
                        detail: err_msg,
                        duration_secs: duration,
                    });
                }
            }

            // Small pause between uploads
            tokio::time::sleep(Duration::from_millis(250)).await;
        }

        self.print_summary();
    }

    fn print_header(&self, directory: &str, total_count: usize) {
        println!("{}╔══════════════════════════════════════════════════════════════╗{}", CYAN, RESET);
        println!("{}║   📷 Photo Batch Uploader                                    ║{}", CYAN, RESET);
        println!("{}╚══════════════════════════════════════════════════════════════╝{}", CYAN, RESET);
        println!("\n{}📊 Event: {} | Directory: {} | Files: {}{}", BOLD, self.event, directory, total_count, RESET);
    }

    fn print_summary(&self) {
        println!("\n\n{}📋 Upload Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────────────────────────────");
        println!(
            "{:<30} {:<8} {:<30} {:>9}",
            "File", "Status", "Stored As", "Duration"
        );
        println!("──────────────────────────────────────────────────────────────────────────────");

        let mut total_uploaded = 0;
        let mut total_failed = 0;
        let mut total_duration = 0.0;

        for res in &self.results {
            let status_icon = if res.success { "✅" } else { "❌" };
            let detail = if res.success { res.detail.as_str() } else { "-" };
            println!(
                "{:<30} {:<8} {:<30} {:>8.1}s",
                res.file_name, status_icon, detail, res.duration_secs
            );

            if res.success {
                total_uploaded += 1;
            } else {
                total_failed += 1;
            }
            total_duration += res.duration_secs;
        }

        println!("──────────────────────────────────────────────────────────────────────────────");
        if total_failed == 0 {
            println!("\n{}✨ All photos uploaded{}", GREEN, RESET);
        } else {
            println!("\n{}⚠️  Finished with errors{}", YELLOW, RESET);
        }
        println!("{}📊 Totals:{}", BOLD, RESET);
        println!("  • Uploaded: {}{}{}", GREEN, total_uploaded, RESET);
        println!("  • Failed: {}{}{}", RED, total_failed, RESET);
        println!("  • Total Duration: {:.1}s", total_duration);
    }
}

fn collect_image_files(directory: &str) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let allowed = path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                ALLOWED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false);
        if allowed {
            files.push(path);
        }
    }

    // Sort for deterministic order (alphabetical)
    files.sort();
    Ok(files)
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("{}Usage: upload <event> <directory> [host]{}", BOLD, RESET);
        println!("  event      label stored with every uploaded photo");
        println!("  directory  folder scanned for png/jpg/jpeg/webp files");
        println!("  host       photodesk base URL (default: PHOTODESK_URL or http://127.0.0.1:8080)");
        process::exit(1);
    }

    let event = args[1].clone();
    let directory = args[2].clone();
    let base_url = args
        .get(3)
        .cloned()
        .or_else(|| env::var("PHOTODESK_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string());
    let base_url = base_url.trim_end_matches('/').to_string();

    let mut manager = PhotoUploadManager::new(base_url, event);
    manager.run_batch_upload(&directory).await;
}
