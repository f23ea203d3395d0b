use crate::graph::{ArbitrageCycle, Asset, SwapRoute};

const RULE_WIDTH: usize = 67;

fn rule() -> String {
    format!("\x1b[1;36m{}\x1b[0m", "═".repeat(RULE_WIDTH))
}

fn header(title: &str) -> String {
    format!("{}\n\x1b[1;36m  {}\x1b[0m\n{}\n", rule(), title, rule())
}

/// Route table: one row per hop plus the realized output
pub fn render_route(route: &SwapRoute, from: &Asset, to: &Asset, amount_in: f64) -> String {
    let mut out = header(&format!("BEST ROUTE | {} -> {}", from, to));
    out.push('\n');

    if route.is_empty() {
        if from == to {
            out.push_str("  Same asset: nothing to swap.\n");
        } else {
            out.push_str("\x1b[1;31m  No route found.\x1b[0m\n");
        }
        return out;
    }

    out.push_str(&format!(
        "  \x1b[1m{:<4} │ {:<12} │ {:<12} │ {:>6}\x1b[0m\n",
        "Hop", "From", "To", "Pool"
    ));
    out.push_str(&format!("  {}\n", "─".repeat(4 + 3 + 12 + 3 + 12 + 3 + 6)));

    for (i, (pair, pool)) in route.path.windows(2).zip(&route.pools).enumerate() {
        out.push_str(&format!(
            "  {:<4} │ {:<12} │ {:<12} │ {:>6}\n",
            i + 1,
            pair[0].as_str(),
            pair[1].as_str(),
            format!("#{}", pool)
        ));
    }

    out.push('\n');
    out.push_str(&format!("  Path: {}\n", route.token_path()));
    out.push_str(&format!(
        "  In: \x1b[1m{} {}\x1b[0m | Out: \x1b[1;32m{} {}\x1b[0m\n",
        amount_in, from, route.amount_out, to
    ));
    out
}

pub fn render_detection(found: bool, pool_count: usize) -> String {
    let mut out = header(&format!("ARBITRAGE CHECK | {} pools", pool_count));
    out.push('\n');
    if found {
        out.push_str("  \x1b[1;32m✓\x1b[0m Arbitrage cycle present\n");
    } else {
        out.push_str("  \x1b[1;31m✗\x1b[0m No arbitrage within tolerance\n");
    }
    out
}

pub fn render_cycle(cycle: Option<&ArbitrageCycle>) -> String {
    let mut out = header("ARBITRAGE CYCLE");
    out.push('\n');

    let Some(cycle) = cycle else {
        out.push_str("  No arbitrage cycle found.\n");
        return out;
    };

    out.push_str(&format!("  {}\n", cycle.token_path()));
    for (i, (pair, rate)) in cycle.path.windows(2).zip(&cycle.rates).enumerate() {
        out.push_str(&format!(
            "    {}. {} -> {} @ {:.8} (pool #{})\n",
            i + 1,
            pair[0],
            pair[1],
            rate,
            cycle.pools[i]
        ));
    }
    out.push_str(&format!(
        "  Compounded: \x1b[1m{:.8}\x1b[0m | Profit: \x1b[1;32m{:+.4}%\x1b[0m\n",
        cycle.compounded_rate,
        cycle.profit_percentage()
    ));
    out
}

pub fn display_route(route: &SwapRoute, from: &Asset, to: &Asset, amount_in: f64) {
    println!("{}", render_route(route, from, to, amount_in));
}

pub fn display_detection(found: bool, pool_count: usize) {
    println!("{}", render_detection(found, pool_count));
}

pub fn display_cycle(cycle: Option<&ArbitrageCycle>) {
    println!("{}", render_cycle(cycle));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{find_arbitrage_cycle, find_best_path, Pool};

    #[test]
    fn test_render_route_lists_hops() {
        let pools = vec![Pool::new("ETH", "USDC", 2000.0), Pool::new("USDC", "DAI", 1.0)];
        let (from, to) = (Asset::from("ETH"), Asset::from("DAI"));
        let route = find_best_path(&pools, &from, &to, 1.0).unwrap();
        let text = render_route(&route, &from, &to, 1.0);
        assert!(text.contains("ETH -> USDC -> DAI"));
        assert!(text.contains("#1"));
        assert!(text.contains("2000"));
    }

    #[test]
    fn test_render_empty_route() {
        let (eth, usdc) = (Asset::from("ETH"), Asset::from("USDC"));
        assert!(render_route(&SwapRoute::empty(), &eth, &usdc, 1.0).contains("No route found"));
        assert!(render_route(&SwapRoute::empty(), &eth, &eth, 1.0).contains("nothing to swap"));
    }

    #[test]
    fn test_render_cycle() {
        let pools = vec![
            Pool::one_way("USD", "EUR", 0.9),
            Pool::one_way("EUR", "GBP", 0.8),
            Pool::one_way("GBP", "USD", 1.5),
        ];
        let cycle = find_arbitrage_cycle(&pools, 1e-12).unwrap();
        let text = render_cycle(cycle.as_ref());
        assert!(text.contains("+8.0000%"));
        assert!(render_cycle(None).contains("No arbitrage cycle found"));
        assert!(render_detection(true, 3).contains("present"));
    }
}
