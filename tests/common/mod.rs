#![allow(dead_code)]

use std::io::Write;
use tradeplot::domain::trade::{Side, TradeRecord};

/// One closed-trade row as a trading platform exports it.
pub struct Row<'a> {
    pub ticket: &'a str,
    pub open_time: &'a str,
    pub side: &'a str,
    pub size: &'a str,
    pub item: &'a str,
    pub open_price: &'a str,
    pub close_time: &'a str,
    pub close_price: &'a str,
    pub profit: &'a str,
}

impl<'a> Row<'a> {
    pub fn new(ticket: &'a str, item: &'a str, side: &'a str, profit: &'a str) -> Self {
        Self {
            ticket,
            open_time: "2025.06.25 16:09:01",
            side,
            size: "0.10",
            item,
            open_price: "1.08500",
            close_time: "2025.06.25 18:00:00",
            close_price: "1.08700",
            profit,
        }
    }

    pub fn opened(mut self, open_time: &'a str, open_price: &'a str) -> Self {
        self.open_time = open_time;
        self.open_price = open_price;
        self
    }

    pub fn to_html(&self) -> String {
        format!(
            "<tr align=right><td>{}</td><td class=msdate>{}</td><td>{}</td><td class=mspt>{}</td>\
             <td>{}</td><td style=\"mso-number-format:0\\.00000;\">{}</td><td>0.00000</td><td>0.00000</td>\
             <td class=msdate>{}</td><td>{}</td><td class=mspt>0.00</td><td class=mspt>0.00</td>\
             <td class=mspt>0.00</td><td class=mspt>{}</td></tr>\n",
            self.ticket,
            self.open_time,
            self.side,
            self.size,
            self.item,
            self.open_price,
            self.close_time,
            self.close_price,
            self.profit
        )
    }
}

/// A statement in the shape of a platform "Detailed Statement" export.
pub fn statement(rows: &[Row]) -> String {
    let body: String = rows.iter().map(Row::to_html).collect();
    format!(
        r##"<html><head><title>Statement: 1234567 - Demo Account</title></head>
<body topmargin=1 marginheight=1>
<div align=center><div style="font: 20pt Times New Roman"><b>Demo Broker Ltd.</b></div><br>
<table cellspacing=1 cellpadding=3 border=0>
<tr align=left><td colspan=2><b>Account: 1234567</b></td><td colspan=5><b>Name: Demo Account</b></td></tr>
<tr align=left><td colspan=13><b>Closed Transactions:</b></td></tr>
<tr align=center bgcolor="#C0C0C0">
<td>Ticket</td><td nowrap>Open Time</td><td>Type</td><td>Size</td><td>Item</td>
<td>Price</td><td>S / L</td><td>T / P</td><td nowrap>Close Time</td>
<td>Price</td><td>Commission</td><td>Taxes</td><td>Swap</td><td>Profit</td></tr>
<tr bgcolor="#E0E0E0" align=right><td>1000</td><td class=msdate>2025.06.01 00:00:00</td><td>balance</td><td colspan=10 align=left>Deposit</td><td class=mspt>10 000.00</td></tr>
{body}<tr align=right><td colspan=10>&nbsp;</td><td class=mspt>0.00</td><td class=mspt>0.00</td><td class=mspt>0.00</td><td class=mspt>0.00</td></tr>
<tr align=right><td colspan=12 align=left><b>Closed P/L:</b></td><td colspan=2 class=mspt><b>0.00</b></td></tr>
<tr align=left><td colspan=13><b>Open Trades:</b></td></tr>
<tr align=right><td>9999</td><td>2025.06.27 10:00:00</td><td>buy</td><td>1.00</td><td>eurusd</td><td>1.09000</td><td>0.00000</td><td>0.00000</td><td>&nbsp;</td><td>1.09100</td><td>0.00</td><td>0.00</td><td>0.00</td><td>10.00</td></tr>
</table></div></body></html>"##
    )
}

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn make_trade(ticket: &str, instrument: &str, side: Side, open: &str, profit: f64) -> TradeRecord {
    TradeRecord {
        ticket: ticket.to_string(),
        open_time_raw: open.to_string(),
        close_time_raw: "2025.06.25 18:00:00".to_string(),
        side,
        size: 0.1,
        instrument: instrument.to_string(),
        open_price: 1.085,
        close_price: 1.087,
        profit,
    }
}
