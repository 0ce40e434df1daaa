use core_types::TradeRecord;

/// Renders the trade history handed to the AI service: one line per trade,
/// open and closed alike, as
/// `date,symbol,direction,status,pnl,entry,exit`.
///
/// A missing PnL prints as `0` and a missing exit price as an empty field,
/// so the line shape is stable for the model.
pub fn render_trade_history(trades: &[TradeRecord]) -> String {
    trades
        .iter()
        .map(|t| {
            format!(
                "{},{},{},{},{},{},{}",
                t.created_at.format("%Y-%m-%d"),
                t.symbol,
                t.direction,
                t.status,
                t.pnl
                    .map(|p| p.round_dp(2).to_string())
                    .unwrap_or_else(|| "0".to_string()),
                t.entry_price,
                t.exit_price.map(|p| p.to_string()).unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the coaching prompt around the rendered history. The model is
/// instructed to answer with bare JSON matching [`crate::AnalystReview`].
pub fn build_prompt(history: &str) -> String {
    format!(
        "Act as an expert mentor in institutional trading and quantitative analysis.\n\
         Analyze the following trade history from the last 30 days.\n\
         \n\
         Data format (CSV): date, symbol, direction, status, pnl, entry, exit\n\
         \n\
         --- DATA ---\n\
         {history}\n\
         --- END DATA ---\n\
         \n\
         Provide a structured analysis as JSON. Do NOT use markdown.\n\
         The JSON must have EXACTLY this structure:\n\
         {{\n\
           \"summary\": \"A one-paragraph summary of overall performance (max 200 characters).\",\n\
           \"strengths\": [\"Detected strength 1\", \"Detected strength 2\", \"Detected strength 3\"],\n\
           \"weaknesses\": [\"Weakness 1 (recurring mistake)\", \"Weakness 2 (negative pattern)\", \"Weakness 3\"],\n\
           \"tips\": [\"Actionable tip 1\", \"Actionable tip 2\", \"Actionable tip 3\"]\n\
         }}\n\
         \n\
         Be direct, constructive and professional.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::{Direction, TradeStatus};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn trade(status: TradeStatus, pnl: Option<rust_decimal::Decimal>) -> TradeRecord {
        TradeRecord {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            symbol: "EURUSD".to_string(),
            direction: Direction::Long,
            status,
            entry_price: dec!(1.1000),
            exit_price: match status {
                TradeStatus::Closed => Some(dec!(1.1200)),
                TradeStatus::Open => None,
            },
            size: dec!(1),
            pnl,
            notes: None,
            mood: None,
            emotions: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 5, 7, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn closed_trade_renders_all_fields() {
        let line = render_trade_history(&[trade(TradeStatus::Closed, Some(dec!(125.50)))]);
        assert_eq!(line, "2024-05-07,EURUSD,LONG,CLOSED,125.50,1.1000,1.1200");
    }

    #[test]
    fn open_trade_renders_zero_pnl_and_empty_exit() {
        let line = render_trade_history(&[trade(TradeStatus::Open, None)]);
        assert_eq!(line, "2024-05-07,EURUSD,LONG,OPEN,0,1.1000,");
    }

    #[test]
    fn trades_are_newline_delimited() {
        let block = render_trade_history(&[
            trade(TradeStatus::Closed, Some(dec!(10))),
            trade(TradeStatus::Open, None),
        ]);
        assert_eq!(block.lines().count(), 2);
    }

    #[test]
    fn prompt_embeds_the_history_block() {
        let prompt = build_prompt("2024-05-07,EURUSD,LONG,CLOSED,10,1.10,1.12");
        assert!(prompt.contains("--- DATA ---"));
        assert!(prompt.contains("EURUSD"));
        assert!(prompt.contains("\"summary\""));
    }
}
