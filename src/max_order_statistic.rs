//! Poisson二項分布の最大値順序統計量の計算
//!
//! 独立な $t$ 個のランダム分類器の正解数 $X_1, \ldots, X_t$ はそれぞれ
//! Poisson二項分布に従う．このとき最大値 $M = \max_i X_i$ の分布関数は
//! $F_M(k) = F(k)^t$ で与えられる．$t$ は最後の累乗にのみ現れるため，
//! $(n, \boldsymbol{p})$ を固定したまま異なる $t$ に対する計算を高速に行える．

use super::{BaselineError, DiscreteDistribution};
use super::probability::SuccessProb;
use super::poisson_binomial::PoissonBinomial;

extern crate libm;
use libm::pow;


/// Poisson二項分布の最大値順序統計量
///
/// 構成時に1回の試行の分布（pmfとcdf）を計算して保持する．
/// 構成後は不変であり，複数スレッドから同時に参照しても安全．
///
/// # 使用例
/// ```
/// # use max_random_baseline::max_order_statistic::MaxOrderStatisticPoissonBinomial;
/// # use max_random_baseline::probability::SuccessProb;
/// let order = MaxOrderStatisticPoissonBinomial::new(100, &SuccessProb::Uniform(0.5)).unwrap();
/// let baseline = order.max_random_baseline(10).unwrap();
/// assert!(50.0 < baseline && baseline < 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct MaxOrderStatisticPoissonBinomial {
    // 問題数
    n: usize,
    // 1回の試行の分布
    pb: PoissonBinomial,
}


impl MaxOrderStatisticPoissonBinomial {
    /// 問題数と正答確率の指定から最大値順序統計量を初期化
    ///
    /// # 引数
    /// * `n` - データセットの問題数
    /// * `prob` - 正答確率の指定（[`SuccessProb`]の3形式）
    pub fn new(n: usize, prob: &SuccessProb) -> Result<Self, BaselineError> {
        let ps = prob.to_probability_vector(n)?;
        let pb = PoissonBinomial::new(&ps)?;
        Ok(MaxOrderStatisticPoissonBinomial { n, pb })
    }


    /// 問題数 $n$
    pub fn n(&self) -> usize {
        self.n
    }

    /// 1回の試行の分布
    pub fn single_draw(&self) -> &PoissonBinomial {
        &self.pb
    }


    // 分類器の個数tの確認
    fn check_t(t: u64) -> Result<(), BaselineError> {
        if t < 1 {
            Err(BaselineError {
                message: "`t` must be greater than or equal to 1.".to_string()
            })
        } else {
            Ok(())
        }
    }

    // 正解数kの確認
    fn check_k(&self, k: usize) -> Result<(), BaselineError> {
        if k > self.n {
            Err(BaselineError {
                message: format!("`k` must be at most n = {}.", self.n)
            })
        } else {
            Ok(())
        }
    }

    // $F(k)^t$ の計算
    //
    // k < 0 は $F_M(-1) = 0$，k = n は $F_M(n) = 1$ として扱う．
    // k = n を厳密に1とすることで，cdf(n)のわずかな丸め誤差が
    // 大きなtの累乗で増幅されることを防ぐ．
    fn cdf_pow(&self, k: i64, t: u64) -> f64 {
        if k < 0 {
            0.0
        } else if k >= self.n as i64 {
            1.0
        } else {
            pow(self.pb.cdf(k as usize), t as f64)
        }
    }


    /// 最大値の分布関数 $F_M(k) = F(k)^t$ を計算
    ///
    /// # 引数
    /// * `k` - 正解数．$0 \leq k \leq n$ のみ有効．
    /// * `t` - ランダム分類器の個数．$t \geq 1$ のみ有効．
    pub fn max_cdf(&self, k: usize, t: u64) -> Result<f64, BaselineError> {
        Self::check_t(t)?;
        self.check_k(k)?;
        Ok(self.cdf_pow(k as i64, t))
    }


    /// 最大値の確率質量関数 $f_M(k) = F(k)^t - F(k-1)^t$ を計算
    ///
    /// 浮動小数点の引き算によるわずかな負の値は0へ切り上げる．
    ///
    /// # 引数
    /// * `k` - 正解数．$0 \leq k \leq n$ のみ有効．
    /// * `t` - ランダム分類器の個数．$t \geq 1$ のみ有効．
    pub fn max_pmf(&self, k: usize, t: u64) -> Result<f64, BaselineError> {
        Self::check_t(t)?;
        self.check_k(k)?;
        let f_m = self.cdf_pow(k as i64, t) - self.cdf_pow(k as i64 - 1, t);
        Ok(f_m.clamp(0.0, 1.0))
    }


    /// 最大正解数の期待値 $E[M]$ すなわちベースラインを計算
    ///
    /// 生存関数を用いた等価な形
    /// $E[M] = \sum_{k=0}^{n-1} (1 - F(k)^t)$
    /// で計算する．pmfの差分和と異なり大きな値同士の桁落ちが起きないため，
    /// nが大きい場合でも数値的に安定する．
    ///
    /// # 引数
    /// * `t` - ランダム分類器の個数．$t \geq 1$ のみ有効．
    pub fn max_random_baseline(&self, t: u64) -> Result<f64, BaselineError> {
        Self::check_t(t)?;
        let total = (0..self.n)
            .map(|k| 1.0 - self.cdf_pow(k as i64, t))
            .sum();
        Ok(total)
    }


    /// 最大正解数の期待値を正答率 $E[M] / n$ へ変換して計算
    ///
    /// # 引数
    /// * `t` - ランダム分類器の個数．$t \geq 1$ のみ有効．
    ///
    /// # 注意
    /// $n = 0$ の場合は正答率が定義できないためエラーとなる．
    pub fn max_random_accuracy(&self, t: u64) -> Result<f64, BaselineError> {
        if self.n == 0 {
            return Err(BaselineError {
                message: "`n` must be greater than zero to compute an accuracy.".to_string()
            });
        }
        let expectation = self.max_random_baseline(t)?;
        Ok(expectation / (self.n as f64))
    }


    /// 与えられた正答率に対するp値 $Pr\{M \geq \mathrm{round}(acc \cdot n)\}$ を計算
    ///
    /// 正答率は正解数 $\mathrm{round}(acc \cdot n)$ へ変換される．
    /// 丸めは最近接整数への丸めで，中間値（.5）は0から遠い方向へ丸める
    /// （[`f64::round`]と同じ規則）．
    ///
    /// # 引数
    /// * `acc` - 観測された正答率．$0 \leq acc \leq 1$ のみ有効．
    /// * `t` - ランダム分類器の個数．$t \geq 1$ のみ有効．
    pub fn p_value(&self, acc: f64, t: u64) -> Result<f64, BaselineError> {
        Self::check_t(t)?;
        if !(0.0..=1.0).contains(&acc) {
            return Err(BaselineError {
                message: format!("`acc` {} is out of range [0, 1].", acc)
            });
        }
        let num_correct = (acc * self.n as f64).round() as i64;
        Ok(1.0 - self.cdf_pow(num_correct - 1, t))
    }


    /// 分類器の個数を固定した最大値の分布を取得
    ///
    /// # 引数
    /// * `t` - ランダム分類器の個数．$t \geq 1$ のみ有効．
    pub fn max_distribution(&self, t: u64) -> Result<MaxDistribution<'_>, BaselineError> {
        Self::check_t(t)?;
        Ok(MaxDistribution { order: self, t })
    }
}


/// 分類器の個数 $t$ を固定した最大値 $M$ の分布
///
/// [`MaxOrderStatisticPoissonBinomial`]が保持するcdfを借用するため，
/// 構成にかかる計算は累乗のみ．
#[derive(Debug, Clone, Copy)]
pub struct MaxDistribution<'a> {
    order: &'a MaxOrderStatisticPoissonBinomial,
    t: u64,
}

impl DiscreteDistribution for MaxDistribution<'_> {
    fn pmf(&self, k: usize) -> f64 {
        if k > self.order.n {
            return 0.0;
        }
        let f_m = self.order.cdf_pow(k as i64, self.t) - self.order.cdf_pow(k as i64 - 1, self.t);
        f_m.clamp(0.0, 1.0)
    }

    fn cdf(&self, k: usize) -> f64 {
        self.order.cdf_pow(k as i64, self.t)
    }

    fn max_k(&self) -> usize {
        self.order.n
    }

    fn param_to_tuple(&self) -> Vec<(String, f64)> {
        let mut info = vec![("t".to_string(), self.t as f64)];
        let mut params = self.order.pb.param_to_tuple();
        info.append(&mut params);
        info
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    /// t = 1ではベースラインは1回の試行の期待値Σp_iと一致する
    fn test_single_classifier_identity() {
        let ps = vec![0.1, 0.4, 0.6, 0.9];
        let order = MaxOrderStatisticPoissonBinomial::new(4, &SuccessProb::PerExample(ps.clone())).unwrap();
        let expectation: f64 = ps.iter().sum();
        let baseline = order.max_random_baseline(1).unwrap();
        assert!((baseline - expectation).abs() < 1e-9);
    }

    #[test]
    /// n=2, p=0.5, t=1のベースラインは1.0
    fn test_two_trials_single_classifier() {
        let order = MaxOrderStatisticPoissonBinomial::new(2, &SuccessProb::Uniform(0.5)).unwrap();
        let baseline = order.max_random_baseline(1).unwrap();
        assert!((baseline - 1.0).abs() < 1e-9);
    }

    #[test]
    /// n=100, p=0.5, t=10のベースラインは1個の分類器の期待値50を上回り，nを下回る
    fn test_baseline_exceeds_single_draw() {
        let order = MaxOrderStatisticPoissonBinomial::new(100, &SuccessProb::Uniform(0.5)).unwrap();
        let baseline = order.max_random_baseline(10).unwrap();
        assert!(baseline > 50.0);
        assert!(baseline < 100.0);
    }

    #[test]
    /// ラベル数の度数と明示的なリストは同じベースラインを与える
    fn test_label_counts_equal_explicit_list() {
        let mut counts = BTreeMap::new();
        counts.insert(2, 50);
        counts.insert(5, 50);
        let from_counts = MaxOrderStatisticPoissonBinomial::new(100, &SuccessProb::LabelCounts(counts)).unwrap();

        let explicit = [vec![0.5; 50], vec![0.2; 50]].concat();
        let from_list = MaxOrderStatisticPoissonBinomial::new(100, &SuccessProb::PerExample(explicit)).unwrap();

        let b_counts = from_counts.max_random_baseline(10).unwrap();
        let b_list = from_list.max_random_baseline(10).unwrap();
        assert!((b_counts - b_list).abs() < 1e-9);
    }

    #[test]
    /// kを固定すると分布関数はtについて非増加となる
    fn test_max_cdf_monotone_in_t() {
        let order = MaxOrderStatisticPoissonBinomial::new(20, &SuccessProb::Uniform(0.5)).unwrap();
        for k in 0..=20 {
            let mut prev = order.single_draw().cdf(k);
            assert!((order.max_cdf(k, 1).unwrap() - prev).abs() < 1e-12);
            for t in [2, 5, 10, 100] {
                let cdf_t = order.max_cdf(k, t).unwrap();
                assert!(cdf_t <= prev + 1e-12);
                prev = cdf_t;
            }
        }
    }

    #[test]
    /// ベースラインはtについて非減少であり，[n * min(p), n]に含まれる
    fn test_baseline_bounds() {
        let ps = [vec![0.5; 30], vec![0.2; 20]].concat();
        let order = MaxOrderStatisticPoissonBinomial::new(50, &SuccessProb::PerExample(ps)).unwrap();
        let lower = 50.0 * 0.2;
        let mut prev = 0.0;
        for t in [1, 2, 10, 100, 1000] {
            let baseline = order.max_random_baseline(t).unwrap();
            assert!(baseline >= lower);
            assert!(baseline <= 50.0);
            assert!(baseline >= prev - 1e-12);
            prev = baseline;
        }
    }

    #[test]
    /// 最大値のpmfの総和は1となる
    fn test_max_pmf_sums_to_one() {
        let order = MaxOrderStatisticPoissonBinomial::new(100, &SuccessProb::Uniform(0.5)).unwrap();
        for t in [1, 10, 1000] {
            let total: f64 = (0..=100)
                .map(|k| order.max_pmf(k, t).unwrap())
                .sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    /// acc = 1.0のp値は1 - F(n-1)^tであり，F(n-1)^tはtについて減少する
    fn test_p_value_at_full_accuracy() {
        let order = MaxOrderStatisticPoissonBinomial::new(20, &SuccessProb::Uniform(0.5)).unwrap();
        let mut prev_cdf = 1.0;
        let mut prev_p = 0.0;
        for t in [1, 10, 100] {
            let cdf_tail = order.max_cdf(19, t).unwrap();
            let p = order.p_value(1.0, t).unwrap();
            assert!((p - (1.0 - cdf_tail)).abs() < 1e-12);
            // 最大値がnに届かない確率は減少し，p値は増加する
            assert!(cdf_tail < prev_cdf);
            assert!(p > prev_p);
            prev_cdf = cdf_tail;
            prev_p = p;
        }
    }

    #[test]
    /// acc * nの中間値（.5）は0から遠い方向へ丸められる
    fn test_p_value_rounding_ties() {
        let order = MaxOrderStatisticPoissonBinomial::new(4, &SuccessProb::Uniform(0.5)).unwrap();
        // 0.125 * 4 = 0.5 → 1 に丸められ，p = 1 - F(0)^t
        let p_half = order.p_value(0.125, 1).unwrap();
        let expected_half = 1.0 - order.single_draw().cdf(0);
        assert!((p_half - expected_half).abs() < 1e-12);
        // 0.375 * 4 = 1.5 → 2 に丸められ，p = 1 - F(1)^t
        let p_three_halves = order.p_value(0.375, 1).unwrap();
        let expected_three_halves = 1.0 - order.single_draw().cdf(1);
        assert!((p_three_halves - expected_three_halves).abs() < 1e-12);
    }

    #[test]
    /// acc = 0.0のp値は1となる
    fn test_p_value_at_zero_accuracy() {
        let order = MaxOrderStatisticPoissonBinomial::new(10, &SuccessProb::Uniform(0.3)).unwrap();
        let p = order.p_value(0.0, 5).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    /// tが非常に大きい場合，裾のF(k)^tは正確に0.0へアンダーフローしNaNにはならない
    fn test_large_t_underflow() {
        let order = MaxOrderStatisticPoissonBinomial::new(10, &SuccessProb::Uniform(0.5)).unwrap();
        let cdf_low = order.max_cdf(0, 100_000).unwrap();
        assert_eq!(cdf_low, 0.0);
        assert!(!cdf_low.is_nan());
        let baseline = order.max_random_baseline(100_000).unwrap();
        assert!(baseline.is_finite());
        assert!(baseline <= 10.0);
    }

    #[test]
    /// t = 0はエラー
    fn test_zero_classifiers_rejected() {
        let order = MaxOrderStatisticPoissonBinomial::new(5, &SuccessProb::Uniform(0.5)).unwrap();
        assert!(order.max_random_baseline(0).is_err());
        assert!(order.max_cdf(2, 0).is_err());
        assert!(order.max_pmf(2, 0).is_err());
        assert!(order.p_value(0.5, 0).is_err());
    }

    #[test]
    /// 台の範囲外のkはエラー
    fn test_out_of_range_k_rejected() {
        let order = MaxOrderStatisticPoissonBinomial::new(5, &SuccessProb::Uniform(0.5)).unwrap();
        assert!(order.max_cdf(6, 1).is_err());
        assert!(order.max_pmf(6, 1).is_err());
    }

    #[test]
    /// 範囲外のaccはエラー
    fn test_out_of_range_acc_rejected() {
        let order = MaxOrderStatisticPoissonBinomial::new(5, &SuccessProb::Uniform(0.5)).unwrap();
        assert!(order.p_value(1.5, 1).is_err());
        assert!(order.p_value(-0.1, 1).is_err());
    }

    #[test]
    /// n = 0ではベースラインは0，p値は1となる
    fn test_degenerate_empty_dataset() {
        let order = MaxOrderStatisticPoissonBinomial::new(0, &SuccessProb::Uniform(0.5)).unwrap();
        let baseline = order.max_random_baseline(10).unwrap();
        assert_eq!(baseline, 0.0);
        let p = order.p_value(0.7, 10).unwrap();
        assert!((p - 1.0).abs() < 1e-12);
        assert!(order.max_random_accuracy(10).is_err());
    }

    #[test]
    /// 正答率への変換はE[M] / nとなる
    fn test_accuracy_conversion() {
        let order = MaxOrderStatisticPoissonBinomial::new(100, &SuccessProb::Uniform(0.5)).unwrap();
        let baseline = order.max_random_baseline(10).unwrap();
        let acc = order.max_random_accuracy(10).unwrap();
        assert!((acc - baseline / 100.0).abs() < 1e-12);
        assert!(0.5 < acc && acc < 1.0);
    }

    #[test]
    /// 固定したtの最大値の分布はDiscreteDistributionの契約を満たす
    fn test_max_distribution_view() {
        let order = MaxOrderStatisticPoissonBinomial::new(30, &SuccessProb::Uniform(0.4)).unwrap();
        let dist = order.max_distribution(10).unwrap();
        let total: f64 = dist.support()
                             .iter()
                             .map(|k| dist.pmf(*k))
                             .sum();
        assert!((total - 1.0).abs() < 1e-9);
        let mut prev = 0.0;
        for k in dist.support() {
            let cdf_k = dist.cdf(k);
            assert!(cdf_k >= prev);
            assert!((dist.pmf(k) - order.max_pmf(k, 10).unwrap()).abs() < 1e-12);
            prev = cdf_k;
        }
        assert!((dist.cdf(30) - 1.0).abs() < 1e-12);
    }
}
