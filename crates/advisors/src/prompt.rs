use common::{IndicatorSnapshot, Subject};

const ANSWER_FORMAT: &str =
    r#"Respond only with JSON of the form {"sentiment_score": <number between -1 and 1>}."#;

/// Prompt for market-analysis mode.
pub fn market_prompt(snapshot: &IndicatorSnapshot) -> String {
    format!(
        "Analyze the following market data and provide a sentiment score between \
         -1 (negative) and 1 (positive):\n\
         - Price: {}\n\
         - EMA 20: {}\n\
         - EMA 50: {}\n\
         - RSI: {}\n\
         - MACD: {}\n\
         - Volume: {}\n\
         - Average Volume (20 periods): {}\n\
         {ANSWER_FORMAT}",
        snapshot.price,
        snapshot.ema20,
        snapshot.ema50,
        snapshot.rsi14,
        snapshot.macd,
        snapshot.volume,
        snapshot.avg_volume20,
    )
}

/// Prompt for sentiment mode.
pub fn sentiment_prompt(pair: &str) -> String {
    format!(
        "Analyze the market sentiment of the currency pair {pair} and predict its market impact \
         as a score between -1 (negative) and 1 (positive).\n{ANSWER_FORMAT}"
    )
}

/// Prompt for scoring an arbitrary piece of text, e.g. a news headline.
pub fn text_prompt(text: &str) -> String {
    format!(
        "Analyze the sentiment of the following text and provide a sentiment score between \
         -1 (negative) and 1 (positive): {text}\n{ANSWER_FORMAT}"
    )
}

pub fn for_subject(subject: &Subject) -> String {
    match subject {
        Subject::Pair { pair } => sentiment_prompt(pair),
        Subject::Market { snapshot } => market_prompt(snapshot),
    }
}
