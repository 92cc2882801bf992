//! Poisson二項分布の計算
//!
//! 正答確率が問題ごとに異なる $n$ 回の独立なBernoulli試行における成功回数の分布．
//! 確率ベクトルから逐次畳み込みでpmfを構成するため，桁落ちのない安定な計算となる．

use super::{BaselineError, DiscreteDistribution, CompareBinomial};
use super::compare_theoretical::TheoreticalBinomial;


/// Poisson二項分布
///
/// 構成時にpmfとcdfを台の全域で計算して保持する．
/// 構成後は不変であり，複数スレッドから同時に参照しても安全．
#[derive(Debug, Clone)]
pub struct PoissonBinomial {
    // 各試行の成功確率
    ps: Vec<f64>,
    // 台の全域で事前計算したpmf
    pmf: Vec<f64>,
    // 台の全域で事前計算したcdf
    cdf: Vec<f64>,
}


impl PoissonBinomial {
    /// 確率ベクトルからPoisson二項分布を初期化
    ///
    /// # 引数
    /// * `ps` - 各試行の成功確率．全ての要素が $[0, 1]$ に含まれること．
    ///
    /// # 使用例
    /// ```
    /// # use max_random_baseline::poisson_binomial::PoissonBinomial;
    /// # use max_random_baseline::DiscreteDistribution;
    /// let pb = PoissonBinomial::new(&[0.5, 0.5]).unwrap();
    /// assert!((pb.pmf(1) - 0.5).abs() < 1e-12);
    /// ```
    pub fn new(ps: &[f64]) -> Result<Self, BaselineError> {
        for p in ps.iter() {
            if !(0.0..=1.0).contains(p) {
                return Err(BaselineError {
                    message: format!("probability of success {} is out of range [0, 1].", p)
                });
            }
        }

        let pmf = Self::convolve_pmf(ps);
        let mut cdf = Vec::with_capacity(pmf.len());
        let mut acc = 0.0;
        for f_k in pmf.iter() {
            acc += f_k;
            // 丸め誤差による1.0超過を抑える
            cdf.push(acc.min(1.0));
        }

        Ok(PoissonBinomial { ps: ps.to_vec(), pmf, cdf })
    }


    // 逐次畳み込みによるpmfの計算
    //
    // 試行を1個ずつ加えて分布を更新する．
    // i個目の試行を加えた後の `pmf[k]` は
    // `pmf[k] * (1 - p_i) + pmf[k-1] * p_i` となる．
    fn convolve_pmf(ps: &[f64]) -> Vec<f64> {
        let mut pmf = vec![0.0; ps.len() + 1];
        pmf[0] = 1.0;
        for (i, p) in ps.iter().enumerate() {
            for k in (1..=(i + 1)).rev() {
                pmf[k] = pmf[k] * (1.0 - p) + pmf[k - 1] * p;
            }
            pmf[0] *= 1.0 - p;
        }
        pmf
    }


    /// 試行回数すなわち問題数 $n$
    pub fn n(&self) -> usize {
        self.ps.len()
    }

    /// 成功回数の期待値 $\sum p_i$
    pub fn expectation(&self) -> f64 {
        self.ps
            .iter()
            .sum()
    }

    /// 各試行の成功確率
    pub fn probabilities(&self) -> &[f64] {
        &self.ps
    }
}


impl DiscreteDistribution for PoissonBinomial {
    fn pmf(&self, k: usize) -> f64 {
        if k > self.n() {
            0.0
        } else {
            self.pmf[k]
        }
    }

    fn cdf(&self, k: usize) -> f64 {
        if k > self.n() {
            1.0
        } else {
            self.cdf[k]
        }
    }

    fn max_k(&self) -> usize {
        self.n()
    }

    fn param_to_tuple(&self) -> Vec<(String, f64)> {
        let mut info = vec![("n".to_string(), self.n() as f64)];
        let mut vec_p = self.ps
                            .iter()
                            .enumerate()
                            .map(|(i, p)| (format!("p_{}", i), *p))
                            .collect::<Vec<(String, f64)>>();
        info.append(&mut vec_p);
        info
    }
}


impl CompareBinomial for PoissonBinomial {
    fn same_condition_binomial(&self) -> Result<TheoreticalBinomial, BaselineError> {
        if self.ps.is_empty() {
            return Err(BaselineError {
                message: "probability vector is empty.".to_string()
            });
        }
        let p = self.ps[0];
        if self.ps.iter().any(|q| (q - p).abs() > 1e-12) {
            return Err(BaselineError {
                message: "probabilities are not uniform; no matching binomial exists.".to_string()
            });
        }
        TheoreticalBinomial::new(self.n(), p)
    }
}
