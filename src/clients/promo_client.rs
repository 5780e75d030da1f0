use tokio::sync::mpsc;

use crate::domain::{PromoCode, PromoCreate};
use crate::messages::StorefrontRequest;
use crate::promo_actor::PromoError;

#[derive(Clone)]
pub struct PromoClient {
    sender: mpsc::Sender<StorefrontRequest>,
}

impl PromoClient {
    pub fn new(sender: mpsc::Sender<StorefrontRequest>) -> Self {
        Self { sender }
    }
}

client_method!(PromoClient => fn create_promo(params: PromoCreate) -> PromoCode as StorefrontRequest::CreatePromo, Error = PromoError);
client_method!(PromoClient => fn toggle_promo(code: String) -> PromoCode as StorefrontRequest::TogglePromo, Error = PromoError);
client_method!(PromoClient => fn list_promos() -> Vec<PromoCode> as StorefrontRequest::ListPromos, Error = PromoError);
