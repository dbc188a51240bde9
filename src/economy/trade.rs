use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::Serialize;

use crate::blueprint::model::cost;
use crate::config::MarketConfig;
use crate::economy::ledger::{CURRENCY, ResourceLedger};
use crate::error::{GameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    /// The city sells, the player pays gold.
    Buy,
    /// The city buys, the player receives gold.
    Sell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub kind: OfferKind,
    pub resource: String,
    pub price: u64,
    pub quantity: u64,
}

impl Offer {
    pub fn total(&self) -> u64 {
        self.price * self.quantity
    }
}

#[derive(Debug, Clone)]
struct CityMarket {
    name: String,
    offers: Vec<Offer>,
}

/// Offers are fixed for the lifetime of a session; only `open_session`
/// rerolls them.
pub struct TradeService {
    config: MarketConfig,
    rng: StdRng,
    session: Option<Vec<CityMarket>>,
}

impl TradeService {
    pub fn new(config: MarketConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng,
            session: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn open_session(&mut self) {
        let mut cities = self.config.cities.clone();
        cities.shuffle(&mut self.rng);
        cities.truncate(self.config.active_cities);

        let session = cities
            .into_iter()
            .map(|name| {
                let mut offers = self.roll_offers(OfferKind::Buy);
                offers.extend(self.roll_offers(OfferKind::Sell));
                CityMarket { name, offers }
            })
            .collect::<Vec<_>>();

        tracing::info!(
            "Market session opened with {:?}",
            session.iter().map(|c| &c.name).collect::<Vec<_>>()
        );
        self.session = Some(session);
    }

    fn roll_offers(&mut self, kind: OfferKind) -> Vec<Offer> {
        let (low, high) = match kind {
            OfferKind::Buy => self.config.buy_factor,
            OfferKind::Sell => self.config.sell_factor,
        };
        let mut resources: Vec<_> = self.config.base_prices.iter().collect();
        resources.shuffle(&mut self.rng);

        resources
            .into_iter()
            .take(self.config.offers_per_side)
            .map(|(resource, base)| {
                let factor = self.rng.random_range(low..=high);
                Offer {
                    kind,
                    resource: resource.clone(),
                    price: ((*base as f64) * factor).round().max(1.0) as u64,
                    quantity: self.config.quantity,
                }
            })
            .collect()
    }

    pub fn active_cities(&self) -> Vec<String> {
        self.session
            .iter()
            .flatten()
            .map(|city| city.name.clone())
            .collect()
    }

    pub fn offers(&self, city: &str) -> Vec<Offer> {
        self.city(city).map(|c| c.offers.clone()).unwrap_or_default()
    }

    fn city(&self, city: &str) -> Option<&CityMarket> {
        self.session.iter().flatten().find(|c| c.name == city)
    }

    pub fn execute_trade(
        &self,
        ledger: &mut ResourceLedger,
        city: &str,
        offer_index: usize,
    ) -> Result<String> {
        let market = self
            .city(city)
            .ok_or_else(|| GameError::InvalidCity(city.to_string()))?;
        let offer = market
            .offers
            .get(offer_index)
            .ok_or_else(|| GameError::InvalidOffer {
                city: city.to_string(),
                index: offer_index,
            })?;

        let total = offer.total();
        let (incoming, amount) = match offer.kind {
            OfferKind::Buy => (offer.resource.as_str(), offer.quantity),
            OfferKind::Sell => (CURRENCY, total),
        };
        let free = ledger.free_space(incoming);
        if free < amount {
            return Err(GameError::NoStorage {
                resource: incoming.to_string(),
                free,
                needed: amount,
            });
        }

        match offer.kind {
            OfferKind::Buy => {
                if !ledger.consume(CURRENCY, total) {
                    return Err(GameError::InsufficientResources {
                        required: cost(&[(CURRENCY, total)]),
                    });
                }
                ledger.add(&offer.resource, offer.quantity);
                tracing::info!("Bought {} {} from {}", offer.quantity, offer.resource, city);
                Ok(format!(
                    "Bought {} {} from {} for {} {}",
                    offer.quantity, offer.resource, city, total, CURRENCY
                ))
            }
            OfferKind::Sell => {
                if !ledger.consume(&offer.resource, offer.quantity) {
                    return Err(GameError::InsufficientResources {
                        required: cost(&[(offer.resource.as_str(), offer.quantity)]),
                    });
                }
                ledger.add(CURRENCY, total);
                tracing::info!("Sold {} {} to {}", offer.quantity, offer.resource, city);
                Ok(format!(
                    "Sold {} {} to {} for {} {}",
                    offer.quantity, offer.resource, city, total, CURRENCY
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_market(offers: Vec<Offer>) -> TradeService {
        let mut trade = TradeService::new(MarketConfig::default(), Some(1));
        trade.session = Some(vec![CityMarket {
            name: "Riverside".to_string(),
            offers,
        }]);
        trade
    }

    fn offer(kind: OfferKind, resource: &str, price: u64) -> Offer {
        Offer {
            kind,
            resource: resource.to_string(),
            price,
            quantity: 10,
        }
    }

    #[test]
    fn test_session_shape() {
        let mut trade = TradeService::new(MarketConfig::default(), Some(42));
        assert!(trade.active_cities().is_empty());
        trade.open_session();

        let cities = trade.active_cities();
        assert_eq!(cities.len(), 3);
        for city in &cities {
            let offers = trade.offers(city);
            let buys: Vec<_> = offers.iter().filter(|o| o.kind == OfferKind::Buy).collect();
            let sells: Vec<_> = offers.iter().filter(|o| o.kind == OfferKind::Sell).collect();
            assert_eq!((buys.len(), sells.len()), (2, 2));
            assert_ne!(buys[0].resource, buys[1].resource);
            assert_ne!(sells[0].resource, sells[1].resource);
        }
    }

    #[test]
    fn test_prices_stay_in_band() {
        let config = MarketConfig::default();
        let mut trade = TradeService::new(config.clone(), Some(9));
        for _ in 0..20 {
            trade.open_session();
            for city in trade.active_cities() {
                for o in trade.offers(&city) {
                    let base = config.base_prices[&o.resource] as f64;
                    let (low, high) = match o.kind {
                        OfferKind::Buy => config.buy_factor,
                        OfferKind::Sell => config.sell_factor,
                    };
                    let price = o.price as f64;
                    assert!(price >= (base * low).round().max(1.0), "{o:?}");
                    assert!(price <= (base * high).round(), "{o:?}");
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_market() {
        let mut a = TradeService::new(MarketConfig::default(), Some(5));
        let mut b = TradeService::new(MarketConfig::default(), Some(5));
        a.open_session();
        b.open_session();
        assert_eq!(a.active_cities(), b.active_cities());
        let city = &a.active_cities()[0];
        assert_eq!(a.offers(city), b.offers(city));
    }

    #[test]
    fn test_sell_pays_price_times_quantity() {
        let trade = fixed_market(vec![offer(OfferKind::Sell, "food", 3)]);
        let mut ledger = ResourceLedger::default();
        ledger.add("food", 15);
        ledger.add(CURRENCY, 50);

        trade.execute_trade(&mut ledger, "Riverside", 0).unwrap();
        assert_eq!(ledger.amount_of(CURRENCY), 80);
        assert_eq!(ledger.amount_of("food"), 5);

        assert!(matches!(
            trade.execute_trade(&mut ledger, "Riverside", 0),
            Err(GameError::InsufficientResources { .. })
        ));
        assert_eq!(ledger.amount_of(CURRENCY), 80);
        assert_eq!(ledger.amount_of("food"), 5);
    }

    #[test]
    fn test_buy_requires_gold() {
        let trade = fixed_market(vec![offer(OfferKind::Buy, "iron", 7)]);
        let mut ledger = ResourceLedger::default();
        ledger.add(CURRENCY, 69);
        assert!(trade.execute_trade(&mut ledger, "Riverside", 0).is_err());
        assert_eq!(ledger.amount_of("iron"), 0);

        ledger.add(CURRENCY, 1);
        let message = trade.execute_trade(&mut ledger, "Riverside", 0).unwrap();
        assert_eq!(message, "Bought 10 iron from Riverside for 70 gold");
        assert_eq!(ledger.amount_of(CURRENCY), 0);
        assert_eq!(ledger.amount_of("iron"), 10);
    }

    #[test]
    fn test_buy_into_full_store_keeps_gold() {
        let trade = fixed_market(vec![offer(OfferKind::Buy, "iron", 7)]);
        let mut ledger = ResourceLedger::default();
        ledger.add(CURRENCY, 500);
        ledger.add("iron", 95);

        assert!(matches!(
            trade.execute_trade(&mut ledger, "Riverside", 0),
            Err(GameError::NoStorage { free: 5, needed: 10, .. })
        ));
        assert_eq!(ledger.amount_of(CURRENCY), 500);
        assert_eq!(ledger.amount_of("iron"), 95);

        ledger.increase_capacity("iron", 5);
        trade.execute_trade(&mut ledger, "Riverside", 0).unwrap();
        assert_eq!(ledger.amount_of(CURRENCY), 430);
        assert_eq!(ledger.amount_of("iron"), 105);
    }

    #[test]
    fn test_sell_with_full_treasury_keeps_goods() {
        let trade = fixed_market(vec![offer(OfferKind::Sell, "food", 3)]);
        let mut ledger = ResourceLedger::default();
        ledger.add(CURRENCY, 980);
        ledger.add("food", 10);

        let err = trade.execute_trade(&mut ledger, "Riverside", 0).unwrap_err();
        assert_eq!(err.to_string(), "not enough storage for 30 gold, only 20 free");
        assert_eq!(ledger.amount_of("food"), 10);
        assert_eq!(ledger.amount_of(CURRENCY), 980);
    }

    #[test]
    fn test_invalid_city_and_index() {
        let trade = fixed_market(vec![]);
        let mut ledger = ResourceLedger::default();
        assert!(matches!(
            trade.execute_trade(&mut ledger, "Atlantis", 0),
            Err(GameError::InvalidCity(_))
        ));
        assert!(matches!(
            trade.execute_trade(&mut ledger, "Riverside", 3),
            Err(GameError::InvalidOffer { index: 3, .. })
        ));
    }
}
