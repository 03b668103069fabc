use crate::config::OrderBookConfig;
use crate::error::SubmitError;
use crate::price_level::PriceLevel;
use crate::sink::TradeSink;
use crate::trade::Trade;
use crate::types::{BookSnapshot, LevelSummary, Order, OrderRequest, Price, Side, Volume};
use std::collections::btree_map::OccupiedEntry;
use std::collections::BTreeMap;
use tracing::{debug, debug_span, info, trace, warn};

/// Maps each price to the FIFO queue of orders resting at that price.
type PriceLevelMap = BTreeMap<Price, PriceLevel>;

/// One side of the book. The map is always ascending by price, so "best" is
/// the last key for bids and the first key for asks.
#[derive(Debug)]
struct BookSide {
    side: Side,
    levels: PriceLevelMap,
}

impl BookSide {
    fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    fn best_level_entry(&mut self) -> Option<OccupiedEntry<'_, Price, PriceLevel>> {
        match self.side {
            Side::Buy => self.levels.last_entry(),
            Side::Sell => self.levels.first_entry(),
        }
    }

    /// Levels ordered best price first.
    fn levels(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    /// Joins the back of the queue at the order's own limit price, opening a new level if needed.
    fn insert(&mut self, order: Order) {
        let side = self.side;
        let price = order.price();

        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price, side))
            .push_back(order);
    }

    fn summaries(&self) -> Vec<LevelSummary> {
        self.levels()
            .map(|level| LevelSummary {
                price: level.price(),
                total: level.total(),
            })
            .collect()
    }
}

/// A continuous double-auction book for a single instrument.
///
/// Incoming orders are crossed against the opposite side using price-then-time
/// priority. Every trade executes at the resting order's price. Whatever remains
/// unfilled rests on the order's own side at its limit price.
///
/// Produced trades are handed to the injected `TradeSink` in matching order,
/// after the book has applied all fills and insertions for the submission.
///
/// ### Thread Safety
///
/// `submit` takes `&mut self` and runs matching, insertion and sink delivery as
/// one unit. Concurrent producers must be serialized externally, for instance with
/// `SharedOrderBook`, which guards the whole book with a single lock.
#[derive(Debug)]
pub struct OrderBook<S = Vec<Trade>> {
    config: OrderBookConfig,
    /// Ask side (sell orders): best is the lowest price
    asks: BookSide,
    /// Bid side (buy orders): best is the highest price
    bids: BookSide,
    sink: S,
}

impl<S: TradeSink> OrderBook<S> {
    /// Creates a new empty order book with the default configuration.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{OrderBook, Trade};
    ///
    /// let order_book = OrderBook::new(Vec::<Trade>::new());
    /// assert_eq!(order_book.best_bid(), None);
    /// ```
    pub fn new(sink: S) -> Self {
        Self::with_config(OrderBookConfig::default(), sink)
    }

    /// Creates a new empty order book with the given configuration.
    pub fn with_config(config: OrderBookConfig, sink: S) -> Self {
        info!(
            symbol = %config.symbol,
            tick_size = %config.tick_size.step(),
            "Order book created"
        );

        OrderBook {
            config,
            asks: BookSide::new(Side::Sell),
            bids: BookSide::new(Side::Buy),
            sink,
        }
    }

    /// Submits an order: matches it, rests any remainder, then notifies the sink.
    ///
    /// This method:
    /// 1. Crosses the order against the opposite side, best price first
    /// 2. Inserts the unfilled remainder (if any) at the order's own limit price
    /// 3. Appends every produced trade to the sink, in the order it occurred
    ///
    /// ## Arguments
    ///
    /// * `order`: The incoming order
    ///
    /// ## Returns
    ///
    /// The trades produced by this submission (possibly none).
    ///
    /// ## Errors
    ///
    /// `SubmitError::Sink` when the sink rejects a trade. The book is not rolled
    /// back: the error carries every produced trade and how many reached the sink.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{Order, OrderBook, Trade};
    ///
    /// let mut order_book = OrderBook::new(Vec::<Trade>::new());
    /// order_book.submit(Order::buy("you", 100, 10).unwrap()).unwrap();
    ///
    /// let trades = order_book.submit(Order::sell("me", 100, 20).unwrap()).unwrap();
    /// assert_eq!(trades.len(), 1);
    /// assert_eq!(trades[0].quantity, 10);
    /// assert_eq!(order_book.best_bid(), None);
    /// assert_eq!(order_book.best_ask(), Some(100));
    /// ```
    pub fn submit(&mut self, mut order: Order) -> Result<Vec<Trade>, SubmitError> {
        let span = debug_span!("submit", symbol = %self.config.symbol, order = %order);
        let _entered = span.enter();

        let trades = self.try_to_fill(&mut order);

        let rested = order.unfilled();
        if rested > 0 {
            self.side_mut(order.side()).insert(order);
        }
        debug_assert!(!self.is_crossed(), "book left crossed after submission");

        debug!(trades = trades.len(), rested, "Order processed");

        self.deliver(trades)
    }

    /// Validates a raw request with the configured tick size, then submits it.
    ///
    /// ## Errors
    ///
    /// `SubmitError::InvalidOrder` when the request does not describe a valid
    /// order; the book is untouched in that case.
    pub fn submit_request(&mut self, request: OrderRequest) -> Result<Vec<Trade>, SubmitError> {
        let order = request.into_order(&self.config.tick_size).map_err(|error| {
            warn!(symbol = %self.config.symbol, %error, "Rejected order request");
            error
        })?;

        self.submit(order)
    }

    /// Runs one matching pass of `incoming` against the opposite side.
    ///
    /// Stops as soon as the incoming order is filled, the opposite side is empty,
    /// or the best remaining price no longer crosses. Levels are price-sorted, so
    /// a failed cross at the best level means no worse level can cross either.
    fn try_to_fill(&mut self, incoming: &mut Order) -> Vec<Trade> {
        let opposite = self.side_mut(incoming.side().opposite());
        let mut trades = Vec::new();

        while !incoming.is_filled() {
            let Some(mut best_level) = opposite.best_level_entry() else {
                break;
            };
            let Some(trade) = best_level.get_mut().match_head(incoming) else {
                break;
            };

            trace!(
                seller = %trade.seller,
                buyer = %trade.buyer,
                quantity = trade.quantity,
                price = trade.price,
                "Trade executed"
            );
            trades.push(trade);

            if best_level.get().is_empty() {
                best_level.remove();
            }
        }

        trades
    }

    fn deliver(&mut self, trades: Vec<Trade>) -> Result<Vec<Trade>, SubmitError> {
        let mut failure = None;
        for (delivered, trade) in trades.iter().enumerate() {
            if let Err(source) = self.sink.append(trade) {
                failure = Some((delivered, source));
                break;
            }
        }

        match failure {
            None => Ok(trades),
            Some((delivered, source)) => {
                warn!(
                    symbol = %self.config.symbol,
                    delivered,
                    total = trades.len(),
                    error = %source,
                    "Trade sink failed"
                );
                Err(SubmitError::Sink {
                    source,
                    trades,
                    delivered,
                })
            }
        }
    }
}

impl<S> OrderBook<S> {
    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Highest resting buy price, or `None` if there are no bids.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Lowest resting sell price, or `None` if there are no asks.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Distance in ticks between best ask and best bid, when both sides are populated.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(best_bid), Some(best_ask)) => best_ask.checked_sub(best_bid),
            _ => None,
        }
    }

    /// Whether best bid >= best ask. Never true once `submit` has returned.
    pub fn is_crossed(&self) -> bool {
        matches!(
            (self.best_bid(), self.best_ask()),
            (Some(best_bid), Some(best_ask)) if best_bid >= best_ask
        )
    }

    /// Captures both sides, best price first, with the unfilled total of each level.
    ///
    /// Read-only: calling it never changes the book.
    ///
    /// ## Examples
    ///
    /// ```
    /// use limit_order_book::{LevelSummary, Order, OrderBook, Trade};
    ///
    /// let mut order_book = OrderBook::new(Vec::<Trade>::new());
    /// order_book.submit(Order::buy("a", 99, 5).unwrap()).unwrap();
    /// order_book.submit(Order::buy("b", 98, 7).unwrap()).unwrap();
    ///
    /// let snapshot = order_book.snapshot();
    /// assert_eq!(snapshot.best_bid, Some(99));
    /// assert_eq!(snapshot.bids[1], LevelSummary { price: 98, total: 7 });
    /// assert!(snapshot.asks.is_empty());
    /// ```
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            symbol: self.config.symbol.clone(),
            best_bid: self.best_bid(),
            best_ask: self.best_ask(),
            asks: self.asks.summaries(),
            bids: self.bids.summaries(),
        }
    }

    /// Returns the number of distinct price levels on the bid side.
    pub fn bid_levels_count(&self) -> usize {
        self.bids.levels.len()
    }

    /// Returns the number of distinct price levels on the ask side.
    pub fn ask_levels_count(&self) -> usize {
        self.asks.levels.len()
    }

    /// Returns the number of resting orders at a specific price level, or 0 if none exist.
    pub fn orders_at_price_level(&self, price: Price, side: Side) -> usize {
        self.side(side)
            .levels
            .get(&price)
            .map(PriceLevel::len)
            .unwrap_or(0)
    }

    /// Returns the total unfilled quantity at a specific price level, or 0 if none exist.
    pub fn depth_at(&self, price: Price, side: Side) -> Volume {
        self.side(side)
            .levels
            .get(&price)
            .map(PriceLevel::total)
            .unwrap_or(0)
    }

    /// Iterates resting orders of one side in matching priority: best price
    /// first, arrival order within a price.
    pub fn resting_orders(&self, side: Side) -> impl Iterator<Item = &Order> + '_ {
        self.side(side).levels().flat_map(|level| level.orders())
    }

    /// Symbol and tick size the book was created with.
    pub fn config(&self) -> &OrderBookConfig {
        &self.config
    }

    /// Borrows the trade sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrows the trade sink, e.g. to drain a buffer between submissions.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the book and hands back its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: TradeSink + Default> Default for OrderBook<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
