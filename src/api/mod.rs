use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{ComparisonResult, ComparisonRow, Inputs, Verdict, run_comparison};

const INDEX_HTML: &str = "<!doctype html>\n<html><head><title>nest</title></head><body>\
<h1>nest</h1>\
<p>Buy-a-home vs rent-and-invest comparison engine.</p>\
<p>GET or POST <code>/api/compare</code> with camelCase parameters \
(<code>homePrice</code>, <code>downPayment</code>, <code>loanRate</code>, \
<code>loanTermYears</code>, <code>monthlyRent</code>, ...). \
Unset parameters fall back to documented defaults; run the binary with \
<code>--help</code> for the full list.</p>\
</body></html>\n";

/// Overridable subset of the comparison parameters accepted by the web
/// API. All fields optional; anything unset falls back to the CLI default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    home_price: Option<f64>,
    down_payment: Option<f64>,
    pmi_monthly: Option<f64>,
    other_monthly_fees: Option<f64>,
    loan_rate: Option<f64>,
    loan_term_years: Option<u32>,
    appreciation_rate: Option<f64>,
    upfront_fees: Option<f64>,
    investment_growth_rate: Option<f64>,
    monthly_rent: Option<f64>,
    rent_increase_rate: Option<f64>,
    monthly_net_income: Option<f64>,
    income_growth_rate: Option<f64>,
    start_date: Option<NaiveDate>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nest",
    about = "Deterministic buy-a-home vs rent-and-invest comparison (run `nest serve [port]` for the HTTP API)"
)]
struct Cli {
    #[arg(long, default_value_t = 450_000.0, help = "Full price of the home")]
    home_price: f64,
    #[arg(long, default_value_t = 90_000.0, help = "Down payment on the loan")]
    down_payment: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly PMI charge while the balance exceeds 80% of the purchase price"
    )]
    pmi_monthly: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Other fixed monthly home fees (property tax, HOA, ...), flat for the life of the loan"
    )]
    other_monthly_fees: f64,
    #[arg(
        long,
        default_value_t = 4.5,
        help = "Annual fixed loan interest rate in percent"
    )]
    loan_rate: f64,
    #[arg(long, default_value_t = 30, help = "Loan term in years")]
    loan_term_years: u32,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Expected annual home appreciation in percent, compounded monthly"
    )]
    appreciation_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "One-time purchase fees (closing costs, initial repairs); invested instead when renting"
    )]
    upfront_fees: f64,
    #[arg(
        long,
        default_value_t = 8.5,
        help = "Expected annual investment growth in percent, compounded monthly"
    )]
    investment_growth_rate: f64,
    #[arg(
        long,
        default_value_t = 1_500.0,
        help = "Monthly rent if the home is not purchased"
    )]
    monthly_rent: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        help = "Annual rent increase in percent, applied at each 12-month lease renewal"
    )]
    rent_increase_rate: f64,
    #[arg(
        long,
        help = "Net monthly income; adds an income column to the table when set"
    )]
    monthly_net_income: Option<f64>,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual income growth in percent, applied once per elapsed year"
    )]
    income_growth_rate: f64,
    #[arg(
        long,
        help = "First month of the projection as YYYY-MM-DD; defaults to the current month"
    )]
    start_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    start_date: NaiveDate,
    loan_term_months: u32,
    final_home_equity: f64,
    final_investment_balance: f64,
    difference: f64,
    verdict: Verdict,
    rows: Vec<ComparisonRow>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    for (name, value) in [
        ("--home-price", cli.home_price),
        ("--down-payment", cli.down_payment),
        ("--pmi-monthly", cli.pmi_monthly),
        ("--other-monthly-fees", cli.other_monthly_fees),
        ("--upfront-fees", cli.upfront_fees),
        ("--monthly-rent", cli.monthly_rent),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    for (name, rate) in [
        ("--loan-rate", cli.loan_rate),
        ("--appreciation-rate", cli.appreciation_rate),
        ("--investment-growth-rate", cli.investment_growth_rate),
        ("--rent-increase-rate", cli.rent_increase_rate),
        ("--income-growth-rate", cli.income_growth_rate),
    ] {
        if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
            return Err(format!("{name} must be between 0 and 100"));
        }
    }

    if !(1..=100).contains(&cli.loan_term_years) {
        return Err("--loan-term-years must be between 1 and 100".to_string());
    }

    if cli.down_payment > cli.home_price {
        return Err("--down-payment cannot exceed --home-price".to_string());
    }

    if let Some(income) = cli.monthly_net_income {
        if !income.is_finite() || income < 0.0 {
            return Err("--monthly-net-income must be >= 0".to_string());
        }
    }

    Ok(Inputs {
        home_price: cli.home_price,
        down_payment: cli.down_payment,
        pmi_monthly: cli.pmi_monthly,
        other_monthly_fees: cli.other_monthly_fees,
        loan_rate_pct: cli.loan_rate,
        loan_term_years: cli.loan_term_years,
        annual_appreciation_pct: cli.appreciation_rate,
        upfront_home_fees: cli.upfront_fees,
        annual_investment_growth_pct: cli.investment_growth_rate,
        monthly_rent: cli.monthly_rent,
        annual_rent_increase_pct: cli.rent_increase_rate,
        monthly_net_income: cli.monthly_net_income,
        annual_income_growth_pct: cli.income_growth_rate,
        start_date: cli
            .start_date
            .unwrap_or_else(|| Local::now().date_naive()),
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("nest HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

/// One-shot mode: parses the full parameter set from the command line and
/// returns the comparison as pretty JSON.
pub fn run_cli() -> Result<String, String> {
    let cli = Cli::parse();
    let inputs = build_inputs(cli)?;
    let result = run_comparison(&inputs).map_err(|e| e.to_string())?;
    let response = build_compare_response(&inputs, result);
    serde_json::to_string_pretty(&response).map_err(|e| e.to_string())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compare_get_handler(Query(payload): Query<ComparePayload>) -> Response {
    compare_handler_impl(payload).await
}

async fn compare_post_handler(Json(payload): Json<ComparePayload>) -> Response {
    compare_handler_impl(payload).await
}

async fn compare_handler_impl(payload: ComparePayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    match run_comparison(&inputs) {
        Ok(result) => json_response(StatusCode::OK, build_compare_response(&inputs, result)),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<ComparePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload)
}

fn inputs_from_payload(payload: ComparePayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.home_price {
        cli.home_price = v;
    }
    if let Some(v) = payload.down_payment {
        cli.down_payment = v;
    }
    if let Some(v) = payload.pmi_monthly {
        cli.pmi_monthly = v;
    }
    if let Some(v) = payload.other_monthly_fees {
        cli.other_monthly_fees = v;
    }
    if let Some(v) = payload.loan_rate {
        cli.loan_rate = v;
    }
    if let Some(v) = payload.loan_term_years {
        cli.loan_term_years = v;
    }
    if let Some(v) = payload.appreciation_rate {
        cli.appreciation_rate = v;
    }
    if let Some(v) = payload.upfront_fees {
        cli.upfront_fees = v;
    }
    if let Some(v) = payload.investment_growth_rate {
        cli.investment_growth_rate = v;
    }
    if let Some(v) = payload.monthly_rent {
        cli.monthly_rent = v;
    }
    if let Some(v) = payload.rent_increase_rate {
        cli.rent_increase_rate = v;
    }
    if let Some(v) = payload.monthly_net_income {
        cli.monthly_net_income = Some(v);
    }
    if let Some(v) = payload.income_growth_rate {
        cli.income_growth_rate = v;
    }
    if let Some(v) = payload.start_date {
        cli.start_date = Some(v);
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        home_price: 450_000.0,
        down_payment: 90_000.0,
        pmi_monthly: 0.0,
        other_monthly_fees: 0.0,
        loan_rate: 4.5,
        loan_term_years: 30,
        appreciation_rate: 0.0,
        upfront_fees: 0.0,
        investment_growth_rate: 8.5,
        monthly_rent: 1_500.0,
        rent_increase_rate: 2.0,
        monthly_net_income: None,
        income_growth_rate: 0.0,
        start_date: None,
    }
}

fn build_compare_response(inputs: &Inputs, result: ComparisonResult) -> CompareResponse {
    let start_date = result
        .rows
        .first()
        .map(|row| row.date)
        .unwrap_or(inputs.start_date);
    CompareResponse {
        start_date,
        loan_term_months: inputs.loan_term_years * 12,
        final_home_equity: result.summary.final_home_equity,
        final_investment_balance: result.summary.final_investment_balance,
        difference: result.summary.difference,
        verdict: result.summary.verdict,
        rows: result.rows,
    }
}
