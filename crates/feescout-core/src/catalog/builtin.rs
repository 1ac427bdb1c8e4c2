use std::collections::{BTreeMap, BTreeSet};

use super::{CoinSupport, ExchangeInfo, Referral, TransferMethod};
use crate::fee_rule::{Bracket, FeeRule};
use crate::CoinSymbol;

const E_TRANSFER: &str = "E-transfer";
const WIRE: &str = "Wire transfer";
const EFT: &str = "EFT";
const CREDIT_CARD: &str = "Credit card";
const DEBIT_CARD: &str = "Debit card";

fn free(kind: &str, min: f64, max: f64) -> TransferMethod {
    TransferMethod::new(kind, FeeRule::zero(), min, max)
}

fn pct(rate: f64) -> FeeRule {
    FeeRule::Percentage(rate)
}

fn referral(url: &str, text: &str) -> Referral {
    Referral {
        url: url.to_owned(),
        text: text.to_owned(),
    }
}

fn listed(tickers: &[&'static str]) -> CoinSupport {
    CoinSupport::Listed(
        tickers
            .iter()
            .copied()
            .map(CoinSymbol::from_static)
            .collect::<BTreeSet<_>>(),
    )
}

fn withdraw_fees(fees: &[(&'static str, f64)]) -> BTreeMap<CoinSymbol, f64> {
    fees.iter()
        .map(|&(ticker, quantity)| (CoinSymbol::from_static(ticker), quantity))
        .collect()
}

/// 0.2% for BTC, 0.4% for anything else.
fn btc_discounted_trading() -> FeeRule {
    FeeRule::by_coin([(CoinSymbol::btc(), pct(0.002))], pct(0.004))
}

pub(super) fn exchanges() -> Vec<ExchangeInfo> {
    vec![
        ExchangeInfo {
            name: String::from("newton"),
            url: String::from("https://newton.co"),
            referral: referral("https://web.newton.co/r/CPH3MB", "$25 if you spend $100"),
            deposit_methods: vec![
                free(E_TRANSFER, 10.0, 10_000.0),
                free(WIRE, 10_000.0, 1_000_000.0),
                free(EFT, 10.0, 10_000.0),
            ],
            withdraw_methods: vec![
                free(E_TRANSFER, 10.0, 10_000.0),
                TransferMethod::new(
                    WIRE,
                    FeeRule::brackets(
                        vec![Bracket::below(10_000.0, FeeRule::Flat(50.0))],
                        FeeRule::zero(),
                    ),
                    10_000.0,
                    1_000_000.0,
                ),
                free(EFT, 10.0, 10_000.0),
            ],
            trading_fee: FeeRule::zero(),
            real_spread: pct(0.0059),
            withdraw_fee: BTreeMap::new(),
            coins: listed(&[
                "BTC", "ETH", "XRP", "BCH", "LTC", "USDT", "XLM", "XMR", "USDC", "QCAD",
            ]),
        },
        ExchangeInfo {
            name: String::from("Paytrie + Binance"),
            url: String::from("https://paytrie.com"),
            referral: referral("https://paytrie.com/?ref=vxiZrU2L9", "$20 trading fee credit"),
            deposit_methods: vec![free(E_TRANSFER, 100.0, 2_000.0)],
            withdraw_methods: vec![free(E_TRANSFER, 100.0, 5_000.0)],
            trading_fee: FeeRule::Sum(vec![
                pct(0.001),
                FeeRule::brackets(vec![Bracket::below(500.0, FeeRule::Flat(5.0))], pct(0.01)),
            ]),
            real_spread: FeeRule::zero(),
            withdraw_fee: withdraw_fees(&[("BTC", 0.0005), ("ETH", 0.005)]),
            coins: CoinSupport::Lots,
        },
        ExchangeInfo {
            name: String::from("shakepay"),
            url: String::from("https://shakepay.com/"),
            referral: referral("https://shakepay.me/r/G4W9XPF", "$30 if you spend $100"),
            deposit_methods: vec![
                free(E_TRANSFER, 5.0, 10_000.0),
                free(WIRE, 1_000.0, 10_000_000.0),
            ],
            withdraw_methods: vec![
                free(E_TRANSFER, 5.0, 5_000.0),
                free(WIRE, 5_000.0, 10_000_000.0),
            ],
            trading_fee: FeeRule::zero(),
            real_spread: pct(0.0175),
            withdraw_fee: BTreeMap::new(),
            coins: listed(&["BTC", "ETH"]),
        },
        ExchangeInfo {
            name: String::from("coinberry"),
            url: String::from("https://www.coinberry.com"),
            referral: referral(
                "https://app.coinberry.com/invite/6e6c3019bb6",
                "$20 if you spend $50",
            ),
            deposit_methods: vec![
                free(E_TRANSFER, 1.0, 10_000.0),
                free(WIRE, 10_000.0, 500_000.0),
                free(EFT, 1.0, 10_000.0),
            ],
            withdraw_methods: vec![
                free(E_TRANSFER, 100.0, 5_000.0),
                free(WIRE, 10_000.0, 500_000.0),
                free(EFT, 100.0, 5_000.0),
            ],
            trading_fee: FeeRule::zero(),
            real_spread: pct(0.0268),
            withdraw_fee: withdraw_fees(&[("BTC", 0.001), ("ETH", 0.011)]),
            coins: listed(&["BTC", "ETH", "XRP", "BCH", "LTC", "XLM"]),
        },
        ExchangeInfo {
            name: String::from("netcoins"),
            url: String::from("https://netcoins.ca/"),
            referral: referral("https://netcoins.app/r?ac=0E9362", "$10 if you spend $100"),
            deposit_methods: vec![free(E_TRANSFER, 10.0, 10_000.0), free(WIRE, 500.0, 10_000.0)],
            withdraw_methods: vec![
                free(E_TRANSFER, 1.0, 10_000.0),
                free(WIRE, 10_000.0, 10_000_000.0),
            ],
            trading_fee: pct(0.005),
            real_spread: pct(0.0294),
            withdraw_fee: withdraw_fees(&[("BTC", 0.0005), ("ETH", 0.02)]),
            coins: listed(&["BTC", "ETH", "XRP", "BCH", "LTC", "USDT", "QCAD"]),
        },
        ExchangeInfo {
            name: String::from("Bull bitcoin"),
            url: String::from("https://bullbitcoin.com/"),
            referral: referral(
                "https://bullbitcoin.com/signup?referralcode=f8e3d7b364cc4f61f2277f0f42c9ed06a68982ade6",
                "$10 if you spend $100",
            ),
            deposit_methods: vec![
                free(E_TRANSFER, 1.0, 10_000.0),
                free(WIRE, 1.0, 10_000_000.0),
                free(EFT, 0.0, 50_000.0),
            ],
            withdraw_methods: vec![
                TransferMethod::new(
                    E_TRANSFER,
                    FeeRule::brackets(
                        vec![
                            Bracket::at_most(100.0, FeeRule::zero()),
                            Bracket::at_most(1_000.0, pct(0.005)),
                            Bracket::at_most(3_000.0, pct(0.0075)),
                        ],
                        pct(0.01),
                    ),
                    25.0,
                    10_000.0,
                ),
                TransferMethod::new(WIRE, pct(0.0125), 25.0, 500_000.0),
                free(EFT, 25.0, 10_000_000.0),
            ],
            trading_fee: FeeRule::zero(),
            real_spread: pct(0.0207),
            withdraw_fee: BTreeMap::new(),
            coins: listed(&["BTC"]),
        },
        ExchangeInfo {
            name: String::from("coinsquare"),
            url: String::from("https://coinsquare.com"),
            referral: referral("coinsquare.com/register?r=3lBEq", "$10 if you spend $100"),
            deposit_methods: vec![
                TransferMethod::new(E_TRANSFER, pct(0.015), 20.0, 10_000.0),
                free(WIRE, 10_000.0, 10_000_000.0),
            ],
            withdraw_methods: vec![
                TransferMethod::new(WIRE, pct(0.02), 10_000.0, 10_000_000.0),
                TransferMethod::new(EFT, pct(0.02), 20.0, 10_000.0),
            ],
            trading_fee: btc_discounted_trading(),
            real_spread: pct(0.0208),
            withdraw_fee: withdraw_fees(&[("BTC", 0.0005), ("ETH", 0.005)]),
            coins: listed(&[
                "BTC", "XLM", "BSV", "DASH", "ETH", "DOGE", "XRP", "BAB", "ETC", "LTC",
            ]),
        },
        ExchangeInfo {
            name: String::from("bitbuy"),
            url: String::from("https://bitbuy.ca/"),
            referral: referral("https://bitbuy.ca/sign-up?c=AU95LPPS2", "$20 if you spend $250"),
            deposit_methods: vec![
                TransferMethod::new(E_TRANSFER, pct(0.015), 100.0, 10_000.0),
                TransferMethod::new(WIRE, pct(0.005), 20_000.0, 500_000.0),
            ],
            withdraw_methods: vec![
                TransferMethod::new(E_TRANSFER, pct(0.015), 50.0, 10_000.0),
                TransferMethod::new(WIRE, pct(0.015), 20_000.0, 500_000.0),
            ],
            // Authored as a flat 0.005 rather than 0.5% of the amount.
            trading_fee: FeeRule::Flat(0.005),
            real_spread: pct(0.0111),
            withdraw_fee: withdraw_fees(&[("BTC", 0.00025), ("ETH", 0.01)]),
            coins: listed(&[
                "BTC", "XRP", "BCH", "LTC", "USDT", "XLM", "XMR", "USDC", "QCAD",
            ]),
        },
        ExchangeInfo {
            name: String::from("ndax"),
            url: String::from("https://ndax.io"),
            referral: referral("https://one.ndax.io/bfP6NZ", "$10 if you spend $100"),
            deposit_methods: vec![
                free(E_TRANSFER, 1.0, 10_000.0),
                free(WIRE, 1.0, 10_000_000.0),
                free("Bank draft", 1.0, 10_000.0),
            ],
            withdraw_methods: vec![
                TransferMethod::new(WIRE, FeeRule::Flat(25.0), 1.0, 10_000_000.0),
                TransferMethod::new(EFT, FeeRule::Flat(25.0), 1.0, 10_000_000.0),
            ],
            trading_fee: pct(0.002),
            real_spread: pct(0.0063),
            withdraw_fee: withdraw_fees(&[("BTC", 0.000399), ("ETH", 0.0099)]),
            coins: listed(&[
                "BTC", "ETH", "XRP", "USDT", "LINK", "LTC", "ADA", "DOGE", "EOS", "XLM",
            ]),
        },
        ExchangeInfo {
            name: String::from("mybtc"),
            url: String::from("https://mybtc.ca/"),
            referral: referral("", "Don't use this exchange"),
            deposit_methods: vec![
                TransferMethod::new(E_TRANSFER, pct(0.0775), 30.0, 10_000.0),
                TransferMethod::new(WIRE, pct(0.0475), 10_000.0, 250_000.0),
                TransferMethod::new(CREDIT_CARD, pct(0.0975), 75.0, 25_000.0),
            ],
            withdraw_methods: Vec::new(),
            trading_fee: FeeRule::brackets(
                vec![Bracket::at_most(200.0, FeeRule::Flat(2.0))],
                FeeRule::zero(),
            ),
            real_spread: pct(0.0074),
            withdraw_fee: BTreeMap::new(),
            coins: listed(&["BTC"]),
        },
        ExchangeInfo {
            name: String::from("coinsmart"),
            url: String::from("https://www.coinsmart.com/"),
            referral: referral(
                "https://crypto.coinsmart.com/register?promo=Ref-bP8kRb",
                "$15 if you spend $100",
            ),
            deposit_methods: vec![
                TransferMethod::new(
                    E_TRANSFER,
                    FeeRule::brackets(vec![Bracket::below(2_000.0, pct(0.015))], FeeRule::zero()),
                    100.0,
                    10_000.0,
                ),
                free(WIRE, 10_000.0, 1_000_000.0),
                TransferMethod::new(
                    CREDIT_CARD,
                    FeeRule::Greatest(vec![FeeRule::Flat(10.0), pct(0.06)]),
                    50.0,
                    20_000.0,
                ),
            ],
            withdraw_methods: vec![
                TransferMethod::new(WIRE, FeeRule::Flat(0.01), 10_000.0, 1_000_000.0),
                TransferMethod::new(
                    EFT,
                    FeeRule::Greatest(vec![FeeRule::Flat(15.0), pct(0.01)]),
                    50.0,
                    10_000.0,
                ),
            ],
            trading_fee: btc_discounted_trading(),
            real_spread: pct(0.022),
            withdraw_fee: withdraw_fees(&[("BTC", 0.0005), ("ETH", 0.015)]),
            coins: listed(&[
                "BTC", "ETH", "LTC", "XRP", "BCH", "USDT", "EOS", "NEO", "XLM", "ADA", "QCAD",
            ]),
        },
        ExchangeInfo {
            name: String::from("coinbase"),
            url: String::new(),
            referral: referral("", "Don't use this exchange"),
            deposit_methods: vec![
                TransferMethod::new(DEBIT_CARD, pct(0.0399), 5.0, 1_500.0),
                TransferMethod::new(CREDIT_CARD, pct(0.0399), 5.0, 1_500.0),
            ],
            withdraw_methods: Vec::new(),
            trading_fee: pct(0.015),
            real_spread: pct(0.0078),
            withdraw_fee: withdraw_fees(&[("BTC", 0.00003442), ("ETH", 0.001827)]),
            coins: CoinSupport::Lots,
        },
        ExchangeInfo {
            name: String::from("kraken"),
            url: String::from("https://www.kraken.com/"),
            referral: referral("", "nothing for you... booo...."),
            deposit_methods: vec![
                free(WIRE, 125.0, 10_000_000.0),
                TransferMethod::new(
                    "In person Canada Post",
                    FeeRule::Sum(vec![FeeRule::Flat(1.25), pct(0.0025)]),
                    20.0,
                    500.0,
                ),
            ],
            withdraw_methods: vec![
                TransferMethod::new(WIRE, FeeRule::Flat(13.0), 14.0, 100_000.0),
                TransferMethod::new(EFT, pct(0.0025), 125.0, 10_000.0),
            ],
            trading_fee: pct(0.0021),
            real_spread: pct(0.003),
            withdraw_fee: withdraw_fees(&[("BTC", 0.0005), ("ETH", 0.005)]),
            coins: CoinSupport::Lots,
        },
        ExchangeInfo {
            name: String::from("gemini"),
            url: String::from("https://www.gemini.com/"),
            referral: referral("", "Yes but can't find it"),
            deposit_methods: vec![
                free(WIRE, 100.0, 10_000_000.0),
                TransferMethod::new(DEBIT_CARD, pct(0.0349), 1.0, 1_000.0),
            ],
            withdraw_methods: Vec::new(),
            trading_fee: FeeRule::brackets(
                vec![
                    Bracket::at_most(15.0, FeeRule::Flat(1.49)),
                    Bracket::at_most(50.0, FeeRule::Flat(2.99)),
                    Bracket::at_most(100.0, FeeRule::Flat(3.99)),
                    Bracket::at_most(250.0, FeeRule::Flat(4.99)),
                ],
                pct(0.0149),
            ),
            real_spread: pct(0.0145),
            withdraw_fee: BTreeMap::new(),
            coins: CoinSupport::Lots,
        },
        ExchangeInfo {
            name: String::from("localbitcoins"),
            url: String::from("https://localbitcoins.com/"),
            referral: referral("", "Nothing for you... booo...."),
            // Minimums of 10 approximate the 0.0001 BTC trade floor.
            deposit_methods: vec![free(E_TRANSFER, 10.0, 10_000.0), free(WIRE, 10.0, 10_000_000.0)],
            withdraw_methods: vec![free(E_TRANSFER, 1.0, 10_000.0), free(WIRE, 10.0, 10_000_000.0)],
            trading_fee: FeeRule::zero(),
            real_spread: pct(0.0491),
            withdraw_fee: withdraw_fees(&[("BTC", 0.00004949)]),
            coins: listed(&["BTC"]),
        },
        ExchangeInfo {
            name: String::from("crypto.com"),
            url: String::from("https://crypto.com/exchange/"),
            referral: referral("https://crypto.com/app/9pv58czacq", "$25 if you stake 5000 CRO"),
            deposit_methods: vec![free(E_TRANSFER, 100.0, 3_000.0)],
            withdraw_methods: vec![free(E_TRANSFER, 100.0, 3_000.0)],
            trading_fee: pct(0.0016),
            real_spread: pct(0.0148),
            withdraw_fee: withdraw_fees(&[("BTC", 0.0004), ("ETH", 0.005)]),
            coins: CoinSupport::Lots,
        },
    ]
}
