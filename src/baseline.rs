//! ベースラインの一括計算用の関数群
//!
//! いずれの関数も[`MaxOrderStatisticPoissonBinomial`]を新規に構成してから
//! 対応する計算へ委譲する．同じ $(n, \boldsymbol{p})$ に対して複数回の計算を
//! 行う場合は，分布の構成を繰り返さないよう
//! [`MaxOrderStatisticPoissonBinomial`]を直接利用すること．

use super::BaselineError;
use super::probability::SuccessProb;
use super::max_order_statistic::MaxOrderStatisticPoissonBinomial;


/// ランダム分類器 $t$ 個の最大正解数の期待値を計算
///
/// # 引数
/// * `n` - データセットの問題数
/// * `prob` - 正答確率の指定（[`SuccessProb`]の3形式）
/// * `t` - ランダム分類器の個数
///
/// # 使用例
/// ```
/// # use max_random_baseline::baseline::max_random_baseline;
/// # use max_random_baseline::probability::SuccessProb;
/// let baseline = max_random_baseline(100, &SuccessProb::Uniform(0.5), 10).unwrap();
/// assert!(50.0 < baseline && baseline < 100.0);
/// ```
pub fn max_random_baseline(n: usize, prob: &SuccessProb, t: u64) -> Result<f64, BaselineError> {
    let order = MaxOrderStatisticPoissonBinomial::new(n, prob)?;
    order.max_random_baseline(t)
}


/// 最大正解数の確率質量関数を正解数 `num_correct` で評価
///
/// # 引数
/// * `num_correct` - 正解数
/// * `n` - データセットの問題数
/// * `prob` - 正答確率の指定（[`SuccessProb`]の3形式）
/// * `t` - ランダム分類器の個数
pub fn max_random_pmf(num_correct: usize, n: usize, prob: &SuccessProb, t: u64) -> Result<f64, BaselineError> {
    let order = MaxOrderStatisticPoissonBinomial::new(n, prob)?;
    order.max_pmf(num_correct, t)
}


/// 最大正解数の分布関数を正解数 `num_correct` で評価
///
/// # 引数
/// * `num_correct` - 正解数
/// * `n` - データセットの問題数
/// * `prob` - 正答確率の指定（[`SuccessProb`]の3形式）
/// * `t` - ランダム分類器の個数
#[allow(non_snake_case)]
pub fn max_random_F(num_correct: usize, n: usize, prob: &SuccessProb, t: u64) -> Result<f64, BaselineError> {
    let order = MaxOrderStatisticPoissonBinomial::new(n, prob)?;
    order.max_cdf(num_correct, t)
}


/// 観測された正答率に対するp値 $Pr\{M \geq \mathrm{round}(acc \cdot n)\}$ を計算
///
/// # 引数
/// * `acc` - 観測された正答率
/// * `n` - データセットの問題数
/// * `prob` - 正答確率の指定（[`SuccessProb`]の3形式）
/// * `t` - ランダム分類器の個数
pub fn max_random_p_value(acc: f64, n: usize, prob: &SuccessProb, t: u64) -> Result<f64, BaselineError> {
    let order = MaxOrderStatisticPoissonBinomial::new(n, prob)?;
    order.p_value(acc, t)
}
