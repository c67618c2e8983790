use std::env;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use colored::*;
use fuel_ingest::utils::cpf::{check_digits, format_cpf};
use rand::Rng;
use serde_json::{json, Value};

const FUEL_TYPES: [(&str, f64); 3] = [("GASOLINA", 5.50), ("ETANOL", 4.00), ("DIESEL", 6.20)];
const ANOMALY_RATE: f64 = 0.15;
const HEALTH_ATTEMPTS: u32 = 30;

struct Settings {
    api_url: String,
    total_requests: usize,
    batch_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Outcome {
    Success,
    Failure,
    Exception,
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_settings()?;

    println!("{}", "=".repeat(60).bright_blue());
    println!("{}", "🚀 CARGA DE DATOS - API DE ABASTECIMENTOS".bright_blue().bold());
    println!("{}", "=".repeat(60).bright_blue());
    println!("Target:      {}", settings.api_url);
    println!("Requests:    {}", settings.total_requests);
    println!("Lote:        {}", settings.batch_size);
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;

    if !wait_for_api(&client, &settings.api_url).await {
        return Ok(());
    }

    let started = Instant::now();
    let mut outcomes = Vec::with_capacity(settings.total_requests);

    let mut offset = 0;
    while offset < settings.total_requests {
        let size = settings.batch_size.min(settings.total_requests - offset);
        let batch = (0..size).map(|i| send_fueling(&client, &settings, offset + i + 1));
        outcomes.extend(futures::future::join_all(batch).await);

        offset += size;
        if offset < settings.total_requests {
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    print_summary(&settings, &outcomes, started.elapsed());
    Ok(())
}

fn load_settings() -> Result<Settings> {
    let api_url = env::var("API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let total_requests = env::var("TOTAL_REQUESTS")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .context("TOTAL_REQUESTS must be a valid number")?;
    let batch_size: usize = env::var("BATCH_SIZE")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .context("BATCH_SIZE must be a valid number")?;

    Ok(Settings {
        api_url: api_url.trim_end_matches('/').to_string(),
        total_requests,
        batch_size: batch_size.max(1),
    })
}

async fn wait_for_api(client: &reqwest::Client, api_url: &str) -> bool {
    println!("{}", "⏳ Esperando la API...".bright_yellow());

    for _ in 0..HEALTH_ATTEMPTS {
        if let Ok(response) = client.get(format!("{}/health", api_url)).send().await {
            if response.status().is_success() {
                println!("{}", "✓ API disponible!".bright_green());
                println!();
                return true;
            }
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    println!("{}", "✗ La API no respondió".bright_red());
    false
}

async fn send_fueling(client: &reqwest::Client, settings: &Settings, number: usize) -> Outcome {
    let payload = random_fueling();
    let url = format!("{}/api/v1/abastecimentos", settings.api_url);
    let label = format!("[{:03}/{:03}]", number, settings.total_requests);

    match client.post(url).json(&payload).send().await {
        Ok(response) if response.status() == reqwest::StatusCode::CREATED => {
            println!("{} {} {}", "✓".bright_green(), label, "SUCCESS".bright_green());
            Outcome::Success
        }
        Ok(response) => {
            println!(
                "{} {} {} ({})",
                "✗".bright_red(),
                label,
                "ERROR".bright_red(),
                response.status()
            );
            Outcome::Failure
        }
        Err(e) => {
            println!("{} {} {} {}", "✗".bright_red(), label, "EXCEPTION:".bright_red(), e);
            Outcome::Exception
        }
    }
}

/// Registro aleatorio válido; ~15% con precio entre +25% y +50% de la base
fn random_fueling() -> Value {
    let mut rng = rand::thread_rng();
    let (fuel_type, base) = FUEL_TYPES[rng.gen_range(0..FUEL_TYPES.len())];

    let factor = if rng.gen_bool(ANOMALY_RATE) {
        rng.gen_range(1.25..=1.50)
    } else {
        rng.gen_range(0.95..=1.05)
    };

    let seconds_ago = rng.gen_range(0..365 * 24 * 3600);
    let timestamp = chrono::Utc::now().naive_utc() - chrono::Duration::seconds(seconds_ago);

    json!({
        "id_posto": rng.gen_range(1..=500),
        "data_hora": timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "tipo_combustivel": fuel_type,
        "preco_por_litro": round3(base * factor),
        "volume_abastecido": round3(rng.gen_range(15.0..=75.0)),
        "cpf_motorista": random_cpf(&mut rng),
    })
}

fn random_cpf(rng: &mut impl Rng) -> String {
    loop {
        let mut base = [0u8; 9];
        for digit in base.iter_mut() {
            *digit = rng.gen_range(0..10);
        }
        if base.iter().all(|&d| d == base[0]) {
            continue;
        }

        let (first, second) = check_digits(&base);
        let digits: String = base
            .iter()
            .chain([first, second].iter())
            .map(|d| char::from(b'0' + d))
            .collect();
        return format_cpf(&digits);
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn print_summary(settings: &Settings, outcomes: &[Outcome], elapsed: Duration) {
    let total = settings.total_requests;
    let successes = outcomes.iter().filter(|o| **o == Outcome::Success).count();
    let seconds = elapsed.as_secs_f64();
    let success_rate = if total > 0 {
        successes as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    let throughput = if seconds > 0.0 { total as f64 / seconds } else { 0.0 };

    println!();
    println!("{}", "=".repeat(60).bright_blue());
    println!("{}", "✅ COMPLETADO!".bright_green().bold());
    println!("{}", "=".repeat(60).bright_blue());
    println!("Éxitos:      {}/{} ({:.1}%)", successes, total, success_rate);
    println!("Errores:     {}/{}", total - successes, total);
    println!("Tiempo:      {:.2}s", seconds);
    println!("Throughput:  {:.2} req/s", throughput);
    println!("{}", "=".repeat(60).bright_blue());
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuel_ingest::utils::cpf::is_valid_cpf;

    #[test]
    fn test_random_cpf_is_valid() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            assert!(is_valid_cpf(&random_cpf(&mut rng)));
        }
    }

    #[test]
    fn test_random_fueling_shape() {
        for _ in 0..100 {
            let payload = random_fueling();
            let fuel = payload["tipo_combustivel"].as_str().unwrap();
            let base = FUEL_TYPES.iter().find(|(name, _)| *name == fuel).unwrap().1;
            let price = payload["preco_por_litro"].as_f64().unwrap();

            assert!(price >= base * 0.95 - 0.001 && price <= base * 1.50 + 0.001);
            assert!((1..=500).contains(&payload["id_posto"].as_i64().unwrap()));
            let volume = payload["volume_abastecido"].as_f64().unwrap();
            assert!((15.0..=75.0).contains(&volume));
        }
    }
}
