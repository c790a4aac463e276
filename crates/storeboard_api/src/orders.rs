use crate::method::Method;
use crate::records::Records;
use bon::Builder;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
pub struct ListOrdersParams {
    #[builder(default = 1)]
    pub page: u32,
    #[serde(rename = "pageSize")]
    #[builder(default = 1000)]
    pub page_size: u32,
}

impl Default for ListOrdersParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 1000,
        }
    }
}

pub struct ListOrders;

impl Method for ListOrders {
    const PATH: &'static str = "/orders";

    type Response = Records;
    type Params = ListOrdersParams;
}
