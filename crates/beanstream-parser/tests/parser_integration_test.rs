//! Integration tests for the parser crate.
//!
//! Tests cover all directive types, the posting sub-grammar, error recovery,
//! and streaming behavior over multiple chunks.

use beanstream_core::{Amount, CostSpec, CustomValue, Directive, Lot, PriceAnnotation};
use beanstream_parser::{parse, parse_chunks, ParseResult};
use rust_decimal_macros::dec;

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_ok(source: &str) -> ParseResult {
    let result = parse(source);
    assert!(
        result.errors.is_empty(),
        "expected no errors, got: {:?}",
        result.errors
    );
    result
}

fn count_directive_type(result: &ParseResult, type_name: &str) -> usize {
    result
        .directives
        .iter()
        .filter(|d| d.type_name() == type_name)
        .count()
}

// ============================================================================
// Basic Directive Parsing
// ============================================================================

#[test]
fn test_parse_open_directive() {
    let result = parse_ok("2014-01-01 open Assets:Bank:Checking USD");
    assert_eq!(count_directive_type(&result, "open"), 1);

    if let Directive::Open(open) = &result.directives[0] {
        assert_eq!(open.account, "Assets:Bank:Checking");
        assert_eq!(open.currency, Some("USD".to_string()));
    } else {
        panic!("expected open directive");
    }
}

#[test]
fn test_parse_close_directive() {
    let result = parse_ok("2014-12-31 close Assets:Bank:OldAccount");
    if let Directive::Close(close) = &result.directives[0] {
        assert_eq!(close.account, "Assets:Bank:OldAccount");
    } else {
        panic!("expected close directive");
    }
}

#[test]
fn test_parse_balance_directive() {
    let result = parse_ok("2014-01-31 balance Assets:Bank:Checking 1,000.00 USD");
    if let Directive::Balance(balance) = &result.directives[0] {
        assert_eq!(balance.account, "Assets:Bank:Checking");
        assert_eq!(balance.amount, Amount::new(dec!(1000.00), "USD"));
    } else {
        panic!("expected balance directive");
    }
}

#[test]
fn test_parse_transaction_with_postings() {
    let source = "\
2014-05-05 * \"Cafe Mogador\" \"Lamb tagine with wine\"
  Expenses:Restaurant 37.45 USD
  Assets:Cash
";
    let result = parse_ok(source);
    assert_eq!(count_directive_type(&result, "transaction"), 1);
    assert_eq!(count_directive_type(&result, "posting"), 2);

    if let Directive::Transaction(txn) = &result.directives[0] {
        assert_eq!(txn.payee, Some("Cafe Mogador".to_string()));
        assert_eq!(txn.narration, "Lamb tagine with wine");
    } else {
        panic!("expected transaction");
    }
    if let Directive::Posting(posting) = &result.directives[1] {
        assert_eq!(posting.account, "Expenses:Restaurant");
        assert_eq!(posting.amount, Some(Amount::new(dec!(37.45), "USD")));
    } else {
        panic!("expected posting");
    }
    if let Directive::Posting(posting) = &result.directives[2] {
        assert_eq!(posting.account, "Assets:Cash");
        assert_eq!(posting.amount, None);
    } else {
        panic!("expected posting");
    }
}

#[test]
fn test_parse_transaction_tags_and_links() {
    let result = parse_ok("2014-04-23 * \"Flight to Berlin\" #berlin-trip-2014 #germany ^log");
    if let Directive::Transaction(txn) = &result.directives[0] {
        assert_eq!(txn.tags, vec!["berlin-trip-2014", "germany"]);
        assert_eq!(txn.links, vec!["log"]);
    } else {
        panic!("expected transaction");
    }
}

#[test]
fn test_parse_control_directives() {
    let source = "\
option \"title\" \"Example Ledger\"
pushtag #berlin-trip-2014
poptag #berlin-trip-2014
include \"ledgers/2014.beancount\"
plugin \"beancount.plugins.module_name\" \"configuration data\"
";
    let result = parse_ok(source);
    assert_eq!(result.directives.len(), 5);
    assert_eq!(count_directive_type(&result, "option"), 1);
    assert_eq!(count_directive_type(&result, "pushtag"), 1);
    assert_eq!(count_directive_type(&result, "poptag"), 1);
    assert_eq!(count_directive_type(&result, "include"), 1);
    assert_eq!(count_directive_type(&result, "plugin"), 1);

    if let Directive::Opt(opt) = &result.directives[0] {
        assert_eq!(opt.key, "title");
        assert_eq!(opt.value, "Example Ledger");
    } else {
        panic!("expected option directive");
    }
}

#[test]
fn test_parse_event_price_note_document_pad() {
    let source = "\
2014-07-09 event \"location\" \"Paris, France\"
2014-07-09 price USD 1.08 CAD
2014-07-09 note Assets:Checking \"Called about the fees\"
2014-07-09 document Assets:Checking \"statement.pdf\"
2014-07-09 pad Assets:Checking Equity:Opening-Balances
2014-07-09 commodity HOOL
";
    let result = parse_ok(source);
    assert_eq!(result.directives.len(), 6);

    if let Directive::Event(event) = &result.directives[0] {
        assert_eq!(event.name, "location");
        assert_eq!(event.value, "Paris, France");
    } else {
        panic!("expected event directive");
    }
    if let Directive::Price(price) = &result.directives[1] {
        assert_eq!(price.currency, "USD");
        assert_eq!(price.amount, Amount::new(dec!(1.08), "CAD"));
    } else {
        panic!("expected price directive");
    }
}

#[test]
fn test_parse_custom_directive() {
    let result = parse_ok("2014-07-09 custom \"budget\" \"monthly\" 45.30 2014-08-01");
    if let Directive::Custom(custom) = &result.directives[0] {
        assert_eq!(custom.name, "budget");
        assert_eq!(
            custom.args,
            vec![
                CustomValue::String("monthly".to_string()),
                CustomValue::Number(dec!(45.30)),
                CustomValue::Date(
                    beanstream_core::NaiveDate::from_ymd_opt(2014, 8, 1).unwrap()
                ),
            ]
        );
    } else {
        panic!("expected custom directive");
    }
}

// ============================================================================
// Posting Sub-grammar
// ============================================================================

#[test]
fn test_posting_cost_lot_shapes() {
    let source = "\
2014-02-11 * \"Rebalancing\"
  Assets:ETrade:IVV 10 IVV {183.07 USD}
  Assets:ETrade:IVV 20 IVV {183.07 USD, \"ref-001\"}
  Assets:ETrade:IVV 15 IVV {183.07 USD, 2014-02-11}
  Assets:ETrade:IVV -20 IVV {2014-02-11}
  Assets:ETrade:IVV -35 IVV {}
";
    let result = parse_ok(source);
    let costs: Vec<_> = result
        .directives
        .iter()
        .filter_map(|d| d.as_posting())
        .map(|p| p.cost.clone().unwrap())
        .collect();

    let lot_date = beanstream_core::NaiveDate::from_ymd_opt(2014, 2, 11).unwrap();
    assert_eq!(costs.len(), 5);
    assert_eq!(costs[0], CostSpec::new(dec!(183.07), "USD"));
    assert_eq!(
        costs[1],
        CostSpec::new(dec!(183.07), "USD").with_lot(Lot::Label("ref-001".to_string()))
    );
    assert_eq!(
        costs[2],
        CostSpec::new(dec!(183.07), "USD").with_lot(Lot::Date(lot_date))
    );
    assert_eq!(costs[3], CostSpec::default().with_lot(Lot::Date(lot_date)));
    assert_eq!(costs[4], CostSpec::any_lot());
}

#[test]
fn test_posting_price_conventions() {
    let source = "\
2014-05-05 * \"Currency exchange\"
  Assets:Checking -400.00 USD @@ 436.01 CAD
  Assets:CAD 436.01 CAD @ 0.917 USD
";
    let result = parse_ok(source);
    let prices: Vec<_> = result
        .directives
        .iter()
        .filter_map(|d| d.as_posting())
        .map(|p| p.price.clone().unwrap())
        .collect();

    assert_eq!(
        prices[0],
        PriceAnnotation::Total(Amount::new(dec!(436.01), "CAD"))
    );
    assert!(!prices[0].is_unit());
    assert_eq!(
        prices[1],
        PriceAnnotation::Unit(Amount::new(dec!(0.917), "USD"))
    );
    assert!(prices[1].is_unit());
}

#[test]
fn test_posting_flag() {
    let source = "\
2014-05-05 ! \"Pending transfer\"
  ! Assets:Savings -100.00 USD
  Assets:Checking
";
    let result = parse_ok(source);
    let posting = result.directives[1].as_posting().unwrap();
    assert_eq!(posting.flag, Some('!'));
    assert_eq!(posting.account, "Assets:Savings");
}

// ============================================================================
// Error Recovery
// ============================================================================

#[test]
fn test_error_recovery_continues_parsing() {
    let source = "\
2014-01-01 open Assets:Checking
2014-13-40 open Assets:Invalid
2014-01-03 close Assets:Checking
";
    let result = parse(source);
    assert_eq!(result.directives.len(), 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].pos.line, 2);
    assert!(result.errors[0].line.contains("2014-13-40"));
}

#[test]
fn test_errors_carry_position_and_text() {
    let source = "2014-01-01 open Assets:A\n\n; comment\nbogus line here\n";
    let result = parse(source);
    assert_eq!(result.errors.len(), 1);
    let error = &result.errors[0];
    // Blank and comment lines still count toward line numbers.
    assert_eq!(error.pos.line, 4);
    assert_eq!(error.line, "bogus line here");
    assert!(format!("{error}").contains("line 4"));
}

#[test]
fn test_malformed_header_orphans_postings() {
    let source = "\
2014-13-40 * \"Bad date\"
  Assets:Checking -400.00 USD
";
    let result = parse(source);
    // Both the header and the now-orphaned posting line fail.
    assert_eq!(result.directives.len(), 0);
    assert_eq!(result.errors.len(), 2);
}

// ============================================================================
// Streaming
// ============================================================================

#[test]
fn test_chunked_input_matches_whole_input() {
    let whole = "\
2014-05-05 * \"Coffee\"
  Expenses:Food 5.00 USD
  Assets:Cash
2014-05-06 balance Assets:Cash -5.00 USD
";
    let chunks = [
        "2014-05-05 * \"Coffee\"\n  Expenses:Food 5.00 USD\n",
        "  Assets:Cash\n2014-05-06 balance Assets:Cash -5.00 USD\n",
    ];

    let from_whole = parse_ok(whole).directives;
    let from_chunks: Vec<_> = parse_chunks(chunks.into_iter())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(from_whole, from_chunks);
}

#[test]
fn test_error_position_unaffected_by_chunking() {
    let chunks = [
        "2014-01-01 open Assets:A\n",
        "2014-01-02 open Assets:B\nbogus line here\n",
    ];
    let errors: Vec<_> = parse_chunks(chunks.into_iter())
        .filter_map(Result::err)
        .collect();
    assert_eq!(errors.len(), 1);
    // "bogus line here" is physical line 3 regardless of the chunk split.
    assert_eq!(errors[0].pos.line, 3);
}

#[test]
fn test_lazy_consumption() {
    let source = "2014-01-01 open Assets:A\n2014-01-02 open Assets:B\n";
    let mut stream = parse_chunks(std::iter::once(source));
    let first = stream.next().unwrap().unwrap();
    assert_eq!(first.type_name(), "open");
    // The rest of the stream is simply never pulled.
}

// ============================================================================
// Round-trips
// ============================================================================

#[test]
fn test_display_round_trip() {
    // Directives re-render to source syntax that parses back to equal values.
    let lines = [
        "2014-01-01 open Assets:Checking USD",
        "2014-12-31 close Assets:Checking",
        "2014-01-01 commodity HOOL",
        "2014-01-31 balance Assets:Checking 1000.00 USD",
        "2014-01-01 pad Assets:Checking Equity:Opening-Balances",
        "2014-07-09 price USD 1.08 CAD",
        "2014-07-09 event \"location\" \"Paris, France\"",
        "option \"title\" \"Example Ledger\"",
        "pushtag #trip",
        "include \"main.beancount\"",
    ];
    for line in lines {
        let first = parse_ok(line).directives.remove(0);
        let rendered = format!("{first}");
        let second = parse_ok(&rendered).directives.remove(0);
        assert_eq!(first, second, "round-trip failed for '{line}'");
    }
}

// ============================================================================
// Real-world Scenario
// ============================================================================

#[test]
fn test_realistic_ledger() {
    let source = "\
option \"title\" \"Example Ledger\"          ; ledger-wide options
option \"operating_currency\" \"USD\"

2014-01-01 open Assets:Checking USD
2014-01-01 open Equity:Opening-Balances
2014-01-01 open Expenses:Restaurant
2014-01-01 open Assets:ETrade:IVV

2014-01-01 pad Assets:Checking Equity:Opening-Balances
2014-01-02 balance Assets:Checking 3,412.00 USD

2014-02-05 * \"Pepe Studios\" \"Invoice for January\" ^invoice-pepe-studios-jan14
  Assets:Checking 8,450.00 USD
  Expenses:Restaurant

2014-02-11 * \"Buying shares\"
  Assets:ETrade:IVV 10 IVV {183.07 USD}
  Assets:Checking -1,830.70 USD

2014-07-09 price IVV 197.90 USD
2014-12-31 close Assets:ETrade:IVV
";
    let result = parse_ok(source);

    assert_eq!(count_directive_type(&result, "option"), 2);
    assert_eq!(count_directive_type(&result, "open"), 4);
    assert_eq!(count_directive_type(&result, "pad"), 1);
    assert_eq!(count_directive_type(&result, "balance"), 1);
    assert_eq!(count_directive_type(&result, "transaction"), 2);
    assert_eq!(count_directive_type(&result, "posting"), 4);
    assert_eq!(count_directive_type(&result, "price"), 1);
    assert_eq!(count_directive_type(&result, "close"), 1);

    // Thousands separators normalize in amounts.
    let balance = result
        .directives
        .iter()
        .find_map(|d| match d {
            Directive::Balance(b) => Some(b),
            _ => None,
        })
        .unwrap();
    assert_eq!(balance.amount.number, dec!(3412.00));
}
