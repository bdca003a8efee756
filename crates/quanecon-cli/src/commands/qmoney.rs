use quanecon_core::qmoney::{self, MoneyParams};

pub fn run(params: MoneyParams) {
    let res = qmoney::simulate(&params);
    super::print_json(&res);
}
